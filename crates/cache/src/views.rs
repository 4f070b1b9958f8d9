//! Views that narrow or split a tier's capabilities

use async_trait::async_trait;
use tierstore_core::{Fetch, Result, Store, StorageKey, StorageName, StorageValue};

/// Exposes only the fetch capability of a tier
pub struct ReadOnly<S> {
    inner: S,
}

impl<S> ReadOnly<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: StorageName> StorageName for ReadOnly<S> {
    fn storage_name(&self) -> String {
        self.inner.storage_name()
    }
}

#[async_trait]
impl<K, V, S> Fetch<K, V> for ReadOnly<S>
where
    K: StorageKey,
    V: StorageValue,
    S: Fetch<K, V>,
{
    async fn fetch(&self, key: &K) -> Result<V> {
        self.inner.fetch(key).await
    }
}

/// Exposes only the store capability of a tier
pub struct WriteOnly<S> {
    inner: S,
}

impl<S> WriteOnly<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: StorageName> StorageName for WriteOnly<S> {
    fn storage_name(&self) -> String {
        self.inner.storage_name()
    }
}

#[async_trait]
impl<K, V, S> Store<K, V> for WriteOnly<S>
where
    K: StorageKey,
    V: StorageValue,
    S: Store<K, V>,
{
    async fn store(&self, key: &K, value: &V) -> Result<()> {
        self.inner.store(key, value).await
    }
}

/// Reads from one tier and writes to another
pub struct Composed<R, W> {
    readable: R,
    writable: W,
}

impl<R, W> Composed<R, W> {
    pub fn new(readable: R, writable: W) -> Self {
        Self { readable, writable }
    }
}

impl<R: StorageName, W: StorageName> StorageName for Composed<R, W> {
    fn storage_name(&self) -> String {
        let (read, write) = (self.readable.storage_name(), self.writable.storage_name());
        if read == write {
            read
        } else {
            format!("{read}|{write}")
        }
    }
}

#[async_trait]
impl<K, V, R, W> Fetch<K, V> for Composed<R, W>
where
    K: StorageKey,
    V: StorageValue,
    R: Fetch<K, V>,
    W: StorageName + Send + Sync,
{
    async fn fetch(&self, key: &K) -> Result<V> {
        self.readable.fetch(key).await
    }
}

#[async_trait]
impl<K, V, R, W> Store<K, V> for Composed<R, W>
where
    K: StorageKey,
    V: StorageValue,
    R: StorageName + Send + Sync,
    W: Store<K, V>,
{
    async fn store(&self, key: &K, value: &V) -> Result<()> {
        self.writable.store(key, value).await
    }
}
