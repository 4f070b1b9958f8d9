//! Dictionary-backed storage tier

use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;
use tierstore_core::{
    Fetch, Modify, Result, Store, StorageError, StorageKey, StorageName, StorageValue, Update,
};
use tierstore_utils::ExclusiveCell;

/// In-memory storage guarded by one [`ExclusiveCell`].
///
/// `store` always succeeds. `update` never inserts: it fails with `NotFound`
/// for an absent key and otherwise replaces the value atomically.
pub struct MemoryStore<K, V> {
    entries: ExclusiveCell<HashMap<K, V>>,
}

impl<K, V> MemoryStore<K, V>
where
    K: Eq + Hash,
{
    #[must_use]
    pub fn new() -> Self {
        Self::with_entries(HashMap::new())
    }

    /// Create a store seeded with `entries`
    #[must_use]
    pub fn with_entries(entries: HashMap<K, V>) -> Self {
        Self {
            entries: ExclusiveCell::new(entries),
        }
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.entries.run(|map| map.len()).await
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<K: Eq + Hash, V> Default for MemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> StorageName for MemoryStore<K, V> {
    fn storage_name(&self) -> String {
        "memory".to_string()
    }
}

#[async_trait]
impl<K, V> Fetch<K, V> for MemoryStore<K, V>
where
    K: StorageKey + Eq + Hash,
    V: StorageValue + Clone,
{
    async fn fetch(&self, key: &K) -> Result<V> {
        self.entries
            .run(|map| map.get(key).cloned())
            .await
            .ok_or_else(|| StorageError::not_found(self.storage_name(), key))
    }
}

#[async_trait]
impl<K, V> Store<K, V> for MemoryStore<K, V>
where
    K: StorageKey + Eq + Hash + Clone,
    V: StorageValue + Clone,
{
    async fn store(&self, key: &K, value: &V) -> Result<()> {
        self.entries
            .run(|map| {
                map.insert(key.clone(), value.clone());
            })
            .await;
        Ok(())
    }
}

#[async_trait]
impl<K, V> Update<K, V> for MemoryStore<K, V>
where
    K: StorageKey + Eq + Hash + Clone,
    V: StorageValue + Clone,
{
    async fn update(&self, key: &K, modify: Modify<V>) -> Result<V> {
        let name = self.storage_name();
        self.entries
            .run(move |map| match map.get_mut(key) {
                Some(value) => {
                    modify(value);
                    Ok(value.clone())
                }
                None => Err(StorageError::not_found(name, key)),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use tierstore_core::UpdateExt;

    fn key(s: &str) -> String {
        s.to_string()
    }

    #[tokio::test]
    async fn test_string_scenario() {
        let store = MemoryStore::<String, String>::new();

        let err = store.fetch(&key("a")).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));

        store.store(&key("a"), &"x".to_string()).await.unwrap();
        assert_eq!(store.fetch(&key("a")).await.unwrap(), "x");

        let updated = store
            .update_with(&key("a"), |v: &mut String| *v = v.to_uppercase())
            .await
            .unwrap();
        assert_eq!(updated, "X");

        let err = store
            .update_with(&key("b"), |v: &mut String| *v = v.to_uppercase())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_on_absent_key_leaves_state_unchanged() {
        let store = MemoryStore::<String, u32>::new();
        store.store(&key("present"), &1).await.unwrap();

        assert!(store
            .update_with(&key("absent"), |v: &mut u32| *v += 1)
            .await
            .is_err());

        assert_eq!(store.len().await, 1);
        assert!(store.fetch(&key("absent")).await.is_err());
        assert_eq!(store.fetch(&key("present")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_store_overwrites() {
        let store = MemoryStore::with_entries(HashMap::from([(1_u8, "old".to_string())]));
        store.store(&1, &"new".to_string()).await.unwrap();
        assert_eq!(store.fetch(&1).await.unwrap(), "new");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(MemoryStore::<String, u64>::new());
        store.store(&key("counter"), &0).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..200 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .update_with(&key("counter"), |v: &mut u64| *v += 1)
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.fetch(&key("counter")).await.unwrap(), 200);
    }

    proptest! {
        #[test]
        fn prop_store_then_fetch_returns_value(
            k in ".*",
            v in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let store = MemoryStore::<String, Vec<u8>>::new();
                store.store(&k, &v).await.unwrap();
                prop_assert_eq!(store.fetch(&k).await.unwrap(), v.clone());
                Ok(())
            })?;
        }
    }
}
