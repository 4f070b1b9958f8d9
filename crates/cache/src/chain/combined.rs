use super::{store_both, Backed};
use async_trait::async_trait;
use tierstore_core::{Fetch, Result, Store, StorageKey, StorageName, StorageValue};

/// Read-through with write-back, writing to both tiers.
///
/// `store` writes the front first and the back second. A front failure
/// stops the write before the back is touched; a back failure leaves the
/// front holding the new value. Nothing is rolled back.
pub struct Combined<F, B> {
    backed: Backed<F, B>,
}

impl<F, B> Combined<F, B> {
    pub fn new(front: F, back: B) -> Self {
        Self {
            backed: Backed::new(front, back),
        }
    }

    pub fn front(&self) -> &F {
        self.backed.front()
    }

    pub fn back(&self) -> &B {
        self.backed.back()
    }
}

impl<F: StorageName, B: StorageName> StorageName for Combined<F, B> {
    fn storage_name(&self) -> String {
        format!("{}<->{}", self.front().storage_name(), self.back().storage_name())
    }
}

#[async_trait]
impl<K, V, F, B> Fetch<K, V> for Combined<F, B>
where
    K: StorageKey,
    V: StorageValue,
    F: Fetch<K, V> + Store<K, V>,
    B: Fetch<K, V>,
{
    async fn fetch(&self, key: &K) -> Result<V> {
        self.backed.fetch(key).await
    }
}

#[async_trait]
impl<K, V, F, B> Store<K, V> for Combined<F, B>
where
    K: StorageKey,
    V: StorageValue,
    F: Store<K, V>,
    B: Store<K, V>,
{
    async fn store(&self, key: &K, value: &V) -> Result<()> {
        store_both(self, self.front(), self.back(), key, value).await
    }
}
