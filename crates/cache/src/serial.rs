//! Queue-serialized wrapper for any storage tier

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tierstore_core::{
    Fetch, Modify, Result, Store, StorageError, StorageKey, StorageName, StorageValue, Update,
};
use tierstore_utils::{QueueError, SerialQueue};

/// Runs every operation on the wrapped tier through one [`SerialQueue`].
///
/// Wrapping a tier that can fetch and store yields an atomic `update`.
/// The guarantee covers callers sharing this instance only; two wrappers
/// around the same resource do not serialize against each other.
pub struct SerialStorage<S> {
    inner: Arc<S>,
    queue: SerialQueue,
}

impl<S> SerialStorage<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner: Arc::new(inner),
            queue: SerialQueue::new(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of operations queued or running
    pub fn waiting(&self) -> usize {
        self.queue.waiting()
    }
}

impl<S: StorageName> SerialStorage<S> {
    async fn run<T, F>(&self, task: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        match self.queue.execute(task).await {
            Ok(output) => output,
            Err(QueueError::Aborted) => Err(StorageError::aborted(self.storage_name())),
        }
    }
}

impl<S: StorageName> StorageName for SerialStorage<S> {
    fn storage_name(&self) -> String {
        format!("serial-{}", self.inner.storage_name())
    }
}

#[async_trait]
impl<K, V, S> Fetch<K, V> for SerialStorage<S>
where
    K: StorageKey + Clone,
    V: StorageValue,
    S: Fetch<K, V> + 'static,
{
    async fn fetch(&self, key: &K) -> Result<V> {
        let inner = Arc::clone(&self.inner);
        let key = key.clone();
        self.run(async move { inner.fetch(&key).await }).await
    }
}

#[async_trait]
impl<K, V, S> Store<K, V> for SerialStorage<S>
where
    K: StorageKey + Clone,
    V: StorageValue + Clone,
    S: Store<K, V> + 'static,
{
    async fn store(&self, key: &K, value: &V) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        let key = key.clone();
        let value = value.clone();
        self.run(async move { inner.store(&key, &value).await }).await
    }
}

#[async_trait]
impl<K, V, S> Update<K, V> for SerialStorage<S>
where
    K: StorageKey + Clone,
    V: StorageValue + Clone,
    S: Fetch<K, V> + Store<K, V> + 'static,
{
    async fn update(&self, key: &K, modify: Modify<V>) -> Result<V> {
        let inner = Arc::clone(&self.inner);
        let key = key.clone();
        self.run(async move {
            let mut value = inner.fetch(&key).await?;
            modify(&mut value);
            inner.store(&key, &value).await?;
            Ok(value)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use tierstore_core::UpdateExt;

    /// Tier with no atomicity of its own: fetch and store yield in between
    #[derive(Default)]
    struct SlowCounter {
        values: Mutex<HashMap<String, u64>>,
    }

    impl StorageName for SlowCounter {
        fn storage_name(&self) -> String {
            "slow".to_string()
        }
    }

    #[async_trait]
    impl Fetch<String, u64> for SlowCounter {
        async fn fetch(&self, key: &String) -> Result<u64> {
            tokio::time::sleep(Duration::from_millis(1)).await;
            let value = self.values.lock().unwrap().get(key).copied();
            value.ok_or_else(|| StorageError::not_found("slow", key))
        }
    }

    #[async_trait]
    impl Store<String, u64> for SlowCounter {
        async fn store(&self, key: &String, value: &u64) -> Result<()> {
            tokio::time::sleep(Duration::from_millis(1)).await;
            self.values.lock().unwrap().insert(key.clone(), *value);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_name_prefix() {
        let serial = SerialStorage::new(SlowCounter::default());
        assert_eq!(serial.storage_name(), "serial-slow");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_serialized() {
        let serial = Arc::new(SerialStorage::new(SlowCounter::default()));
        let key = "hits".to_string();
        serial.store(&key, &0).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..50 {
            let serial = Arc::clone(&serial);
            let key = key.clone();
            handles.push(tokio::spawn(async move {
                serial.update_with(&key, |v: &mut u64| *v += 1).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(serial.fetch(&key).await.unwrap(), 50);
        assert_eq!(serial.waiting(), 0);
    }

    #[tokio::test]
    async fn test_update_of_absent_key_does_not_store() {
        let serial = SerialStorage::new(SlowCounter::default());
        let key = "nothing".to_string();

        let err = serial
            .update_with(&key, |v: &mut u64| *v += 1)
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(serial.inner().values.lock().unwrap().is_empty());
    }
}
