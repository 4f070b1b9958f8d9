use super::store_both;
use async_trait::async_trait;
use tierstore_core::{Result, Store, StorageKey, StorageName, StorageValue};

/// Store-only dual write: front first, then back.
///
/// Same short-circuit rule as [`Combined`](super::Combined): a front failure
/// means the back is never attempted.
pub struct Pushing<F, B> {
    front: F,
    back: B,
}

impl<F, B> Pushing<F, B> {
    pub fn new(front: F, back: B) -> Self {
        Self { front, back }
    }
}

impl<F: StorageName, B: StorageName> StorageName for Pushing<F, B> {
    fn storage_name(&self) -> String {
        format!("{}->{}", self.front.storage_name(), self.back.storage_name())
    }
}

#[async_trait]
impl<K, V, F, B> Store<K, V> for Pushing<F, B>
where
    K: StorageKey,
    V: StorageValue,
    F: Store<K, V>,
    B: Store<K, V>,
{
    async fn store(&self, key: &K, value: &V) -> Result<()> {
        store_both(self, &self.front, &self.back, key, value).await
    }
}
