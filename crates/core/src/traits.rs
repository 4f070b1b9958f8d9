//! Capability contracts every storage tier satisfies.
//!
//! A tier implements any subset of [`Fetch`], [`Store`] and [`Update`] for a
//! fixed key/value pair. Combinators implement the same traits by delegating
//! to the tiers they wrap, so chains of arbitrary depth are built by plain
//! composition.

use crate::errors::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt::Debug;
use std::sync::Arc;

/// Bounds every key type must satisfy
pub trait StorageKey: Debug + Send + Sync + 'static {}

impl<T: Debug + Send + Sync + 'static> StorageKey for T {}

/// Bounds every value type must satisfy
pub trait StorageValue: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> StorageValue for T {}

/// Human-readable name derived from how a storage was built.
///
/// Used only for diagnostics (log fields and error payloads).
pub trait StorageName {
    fn storage_name(&self) -> String;
}

/// Read capability
#[async_trait]
pub trait Fetch<K, V>: StorageName + Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// Fails with `NotFound` when the key is absent, or with the underlying
    /// cause when the value cannot be read.
    async fn fetch(&self, key: &K) -> Result<V>;
}

/// Write capability
#[async_trait]
pub trait Store<K, V>: StorageName + Send + Sync {
    /// Insert or overwrite the value stored under `key`.
    async fn store(&self, key: &K, value: &V) -> Result<()>;
}

/// Modification applied by [`Update::update`]
pub type Modify<V> = Box<dyn FnOnce(&mut V) + Send>;

/// Atomic read-modify-write capability
#[async_trait]
pub trait Update<K, V>: Fetch<K, V> + Store<K, V> {
    /// Fetch the current value, apply `modify`, store and return the result.
    ///
    /// No other operation on the same instance observes the state between
    /// the read and the write. Fails without storing anything if the key is
    /// absent.
    async fn update(&self, key: &K, modify: Modify<V>) -> Result<V>;
}

/// Closure-friendly entry point to [`Update`]
pub trait UpdateExt<K: StorageKey, V: StorageValue>: Update<K, V> {
    fn update_with<'a, F>(&'a self, key: &'a K, modify: F) -> BoxFuture<'a, Result<V>>
    where
        F: FnOnce(&mut V) + Send + 'static,
    {
        self.update(key, Box::new(modify))
    }
}

impl<K, V, S> UpdateExt<K, V> for S
where
    K: StorageKey,
    V: StorageValue,
    S: Update<K, V> + ?Sized,
{
}

impl<S: StorageName + ?Sized> StorageName for Arc<S> {
    fn storage_name(&self) -> String {
        (**self).storage_name()
    }
}

#[async_trait]
impl<K, V, S> Fetch<K, V> for Arc<S>
where
    K: StorageKey,
    V: StorageValue,
    S: Fetch<K, V> + ?Sized,
{
    async fn fetch(&self, key: &K) -> Result<V> {
        (**self).fetch(key).await
    }
}

#[async_trait]
impl<K, V, S> Store<K, V> for Arc<S>
where
    K: StorageKey,
    V: StorageValue,
    S: Store<K, V> + ?Sized,
{
    async fn store(&self, key: &K, value: &V) -> Result<()> {
        (**self).store(key, value).await
    }
}

#[async_trait]
impl<K, V, S> Update<K, V> for Arc<S>
where
    K: StorageKey,
    V: StorageValue,
    S: Update<K, V> + ?Sized,
{
    async fn update(&self, key: &K, modify: Modify<V>) -> Result<V> {
        (**self).update(key, modify).await
    }
}
