//! Fetch-failure recovery adapter
//!
//! Retrying, backing off or substituting a default all live here, above the
//! tiers; nothing inside a tier retries on its own.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::Arc;
use tierstore_core::{Fetch, Result, Store, StorageError, StorageKey, StorageName, StorageValue};
use tracing::debug;

/// What to do when the wrapped tier fails to fetch
pub enum Recovery<V> {
    /// Substitute a fixed value
    Default(V),
    /// Derive a value, or a different failure, from the original error.
    ///
    /// The returned future may await other tiers, sleep between attempts or
    /// do anything else a fallback needs.
    With(Arc<dyn Fn(StorageError) -> BoxFuture<'static, Result<V>> + Send + Sync>),
}

/// Decorator that turns fetch failures into recovered values.
///
/// Stores pass through untouched.
pub struct Recovering<S, V> {
    inner: S,
    recovery: Recovery<V>,
}

impl<S, V> Recovering<S, V> {
    pub fn new(inner: S, recovery: Recovery<V>) -> Self {
        Self { inner, recovery }
    }
}

impl<S: StorageName, V> StorageName for Recovering<S, V> {
    fn storage_name(&self) -> String {
        format!("recovering-{}", self.inner.storage_name())
    }
}

#[async_trait]
impl<K, V, S> Fetch<K, V> for Recovering<S, V>
where
    K: StorageKey,
    V: StorageValue + Clone,
    S: Fetch<K, V>,
{
    async fn fetch(&self, key: &K) -> Result<V> {
        match self.inner.fetch(key).await {
            Ok(value) => Ok(value),
            Err(error) => {
                debug!(
                    storage = %self.inner.storage_name(),
                    ?key,
                    %error,
                    "recovering from fetch failure"
                );
                match &self.recovery {
                    Recovery::Default(value) => Ok(value.clone()),
                    Recovery::With(recover) => recover(error).await,
                }
            }
        }
    }
}

#[async_trait]
impl<K, V, S> Store<K, V> for Recovering<S, V>
where
    K: StorageKey,
    V: StorageValue,
    S: Store<K, V>,
{
    async fn store(&self, key: &K, value: &V) -> Result<()> {
        self.inner.store(key, value).await
    }
}
