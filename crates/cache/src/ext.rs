//! Builder-style composition for any storage tier

use crate::chain::{Backed, Combined, Pushing, ReadThrough};
use crate::recover::{Recovering, Recovery};
use crate::serial::SerialStorage;
use crate::views::{ReadOnly, WriteOnly};
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;
use tierstore_core::{Result, StorageError, StorageName};

/// Composition methods available on every tier.
///
/// Capabilities of the result follow from the capabilities of the inputs:
/// each combinator implements `Fetch` / `Store` / `Update` only where the
/// tiers it wraps make that possible.
pub trait StorageExt: StorageName + Sized {
    /// Serialize every operation through a per-instance queue
    fn serial(self) -> SerialStorage<Self> {
        SerialStorage::new(self)
    }

    /// Read-through with write-back into `self`; stores go to `self` only
    fn backed_by<B>(self, back: B) -> Backed<Self, B> {
        Backed::new(self, back)
    }

    /// Read-through without write-back
    fn read_through<B>(self, back: B) -> ReadThrough<Self, B> {
        ReadThrough::new(self, back)
    }

    /// Read-through with write-back; stores go to both tiers
    fn combined_with<B>(self, back: B) -> Combined<Self, B> {
        Combined::new(self, back)
    }

    /// Stores go to both tiers, front first
    fn pushing_to<B>(self, back: B) -> Pushing<Self, B> {
        Pushing::new(self, back)
    }

    fn read_only(self) -> ReadOnly<Self> {
        ReadOnly::new(self)
    }

    fn write_only(self) -> WriteOnly<Self> {
        WriteOnly::new(self)
    }

    /// Replace fetch failures with the outcome of the future `recover` returns
    fn recover_with<V, F, Fut>(self, recover: F) -> Recovering<Self, V>
    where
        F: Fn(StorageError) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let recover = move |error: StorageError| -> BoxFuture<'static, Result<V>> {
            recover(error).boxed()
        };
        Recovering::new(self, Recovery::With(Arc::new(recover)))
    }

    /// Replace fetch failures with `value`
    fn defaulting<V>(self, value: V) -> Recovering<Self, V> {
        Recovering::new(self, Recovery::Default(value))
    }
}

impl<S: StorageName> StorageExt for S {}
