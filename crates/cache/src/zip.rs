//! Parallel composition of two same-keyed tiers into a tuple-valued tier

use async_trait::async_trait;
use tierstore_core::{
    Fetch, Result, Store, StorageError, StorageKey, StorageName, StorageValue, Tier,
};

/// Tuple-valued tier over two tiers sharing a key type.
///
/// Both halves of an operation run concurrently and both are awaited before
/// the result is reported. If both fail, the first tier's error wins. A
/// failed store may have written the other half.
///
/// Wrap the inputs in [`ReadOnly`](crate::ReadOnly) or
/// [`WriteOnly`](crate::WriteOnly) for the read-only and store-only variants.
pub struct Zip2<S1, S2> {
    first: S1,
    second: S2,
}

/// Zip two tiers into one
pub fn zip<S1, S2>(first: S1, second: S2) -> Zip2<S1, S2> {
    Zip2 { first, second }
}

impl<S1, S2> Zip2<S1, S2> {
    pub fn into_parts(self) -> (S1, S2) {
        (self.first, self.second)
    }
}

impl<S1: StorageName, S2: StorageName> StorageName for Zip2<S1, S2> {
    fn storage_name(&self) -> String {
        format!(
            "zip({},{})",
            self.first.storage_name(),
            self.second.storage_name()
        )
    }
}

impl<S1: StorageName, S2: StorageName> Zip2<S1, S2> {
    fn join_results<A, B>(&self, first: Result<A>, second: Result<B>) -> Result<(A, B)> {
        match (first, second) {
            (Ok(a), Ok(b)) => Ok((a, b)),
            (Err(e), _) => Err(StorageError::composition(self.storage_name(), Tier::First, e)),
            (_, Err(e)) => Err(StorageError::composition(self.storage_name(), Tier::Second, e)),
        }
    }
}

#[async_trait]
impl<K, V1, V2, S1, S2> Fetch<K, (V1, V2)> for Zip2<S1, S2>
where
    K: StorageKey,
    V1: StorageValue,
    V2: StorageValue,
    S1: Fetch<K, V1>,
    S2: Fetch<K, V2>,
{
    async fn fetch(&self, key: &K) -> Result<(V1, V2)> {
        let (first, second) = futures::join!(self.first.fetch(key), self.second.fetch(key));
        self.join_results(first, second)
    }
}

#[async_trait]
impl<K, V1, V2, S1, S2> Store<K, (V1, V2)> for Zip2<S1, S2>
where
    K: StorageKey,
    V1: StorageValue,
    V2: StorageValue,
    S1: Store<K, V1>,
    S2: Store<K, V2>,
{
    async fn store(&self, key: &K, value: &(V1, V2)) -> Result<()> {
        let (v1, v2) = value;
        let (first, second) =
            futures::join!(self.first.store(key, v1), self.second.store(key, v2));
        self.join_results(first, second).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::testing::Broken;
    use crate::{MemoryStore, StorageExt};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_fetch_and_store_pairs() {
        let names = Arc::new(MemoryStore::<u32, String>::new());
        let ages = Arc::new(MemoryStore::<u32, u8>::new());
        let people = zip(Arc::clone(&names), Arc::clone(&ages));

        people.store(&1, &("ada".to_string(), 36)).await.unwrap();

        assert_eq!(names.fetch(&1).await.unwrap(), "ada");
        assert_eq!(ages.fetch(&1).await.unwrap(), 36);
        assert_eq!(people.fetch(&1).await.unwrap(), ("ada".to_string(), 36));
        assert_eq!(people.storage_name(), "zip(memory,memory)");
    }

    #[tokio::test]
    async fn test_either_miss_fails() {
        let names = Arc::new(MemoryStore::<u32, String>::new());
        let ages = MemoryStore::<u32, u8>::new();
        names.store(&1, &"ada".to_string()).await.unwrap();
        let people = zip(Arc::clone(&names), ages);

        let err = people.fetch(&1).await.unwrap_err();

        assert_eq!(err.failed_tier(), Some(Tier::Second));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_store_failure_names_tier() {
        let ages = Arc::new(MemoryStore::<u32, u8>::new());
        let people = zip(Broken("names"), Arc::clone(&ages));

        let err = Store::<u32, (String, u8)>::store(&people, &1, &("ada".to_string(), 36))
            .await
            .unwrap_err();

        assert_eq!(err.failed_tier(), Some(Tier::First));
        // The healthy half still ran to completion
        assert_eq!(ages.fetch(&1).await.unwrap(), 36);
    }

    #[tokio::test]
    async fn test_fetches_run_concurrently() {
        struct Slow;

        impl StorageName for Slow {
            fn storage_name(&self) -> String {
                "slow".to_string()
            }
        }

        #[async_trait]
        impl Fetch<u32, u32> for Slow {
            async fn fetch(&self, key: &u32) -> Result<u32> {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok(*key)
            }
        }

        let pair = zip(Slow, Slow);
        let started = Instant::now();
        assert_eq!(pair.fetch(&5).await.unwrap(), (5, 5));
        assert!(started.elapsed() < Duration::from_millis(190));
    }

    #[tokio::test]
    async fn test_read_only_and_write_only_variants() {
        let left = Arc::new(MemoryStore::<u8, u8>::new());
        let right = Arc::new(MemoryStore::<u8, u8>::new());

        let writer = zip(
            Arc::clone(&left).write_only(),
            Arc::clone(&right).write_only(),
        );
        writer.store(&0, &(1, 2)).await.unwrap();

        let reader = zip(left.read_only(), right.read_only());
        assert_eq!(reader.fetch(&0).await.unwrap(), (1, 2));
    }
}
