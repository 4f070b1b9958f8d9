use async_trait::async_trait;
use tierstore_core::{Fetch, Result, Store, StorageKey, StorageName, StorageValue};
use tracing::{debug, warn};

/// Read-through with write-back.
///
/// `fetch` tries the front; on a miss it reads the back, copies the value
/// into the front on a best-effort basis and returns it. `store` writes to
/// the front only.
pub struct Backed<F, B> {
    front: F,
    back: B,
}

impl<F, B> Backed<F, B> {
    pub fn new(front: F, back: B) -> Self {
        Self { front, back }
    }

    pub fn front(&self) -> &F {
        &self.front
    }

    pub fn back(&self) -> &B {
        &self.back
    }

    pub fn into_parts(self) -> (F, B) {
        (self.front, self.back)
    }
}

impl<F: StorageName, B: StorageName> StorageName for Backed<F, B> {
    fn storage_name(&self) -> String {
        format!("{}<-{}", self.front.storage_name(), self.back.storage_name())
    }
}

#[async_trait]
impl<K, V, F, B> Fetch<K, V> for Backed<F, B>
where
    K: StorageKey,
    V: StorageValue,
    F: Fetch<K, V> + Store<K, V>,
    B: Fetch<K, V>,
{
    async fn fetch(&self, key: &K) -> Result<V> {
        let front_error = match self.front.fetch(key).await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };
        debug!(
            storage = %self.storage_name(),
            ?key,
            error = %front_error,
            "front tier missed, reading back tier"
        );

        match self.back.fetch(key).await {
            Ok(value) => {
                if let Err(error) = self.front.store(key, &value).await {
                    warn!(
                        storage = %self.storage_name(),
                        ?key,
                        %error,
                        "write-back into front tier failed"
                    );
                }
                Ok(value)
            }
            Err(back_error) => {
                debug!(
                    storage = %self.storage_name(),
                    ?key,
                    error = %back_error,
                    "back tier missed too"
                );
                Err(front_error)
            }
        }
    }
}

#[async_trait]
impl<K, V, F, B> Store<K, V> for Backed<F, B>
where
    K: StorageKey,
    V: StorageValue,
    F: Store<K, V>,
    B: StorageName + Send + Sync,
{
    async fn store(&self, key: &K, value: &V) -> Result<()> {
        self.front.store(key, value).await
    }
}

/// Read-through without write-back.
///
/// The back tier only ever serves reads the front could not.
pub struct ReadThrough<F, B> {
    front: F,
    back: B,
}

impl<F, B> ReadThrough<F, B> {
    pub fn new(front: F, back: B) -> Self {
        Self { front, back }
    }
}

impl<F: StorageName, B: StorageName> StorageName for ReadThrough<F, B> {
    fn storage_name(&self) -> String {
        format!("{}<-{}", self.front.storage_name(), self.back.storage_name())
    }
}

#[async_trait]
impl<K, V, F, B> Fetch<K, V> for ReadThrough<F, B>
where
    K: StorageKey,
    V: StorageValue,
    F: Fetch<K, V>,
    B: Fetch<K, V>,
{
    async fn fetch(&self, key: &K) -> Result<V> {
        let front_error = match self.front.fetch(key).await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };
        debug!(
            storage = %self.storage_name(),
            ?key,
            error = %front_error,
            "front tier missed, reading back tier"
        );
        self.back.fetch(key).await.map_err(|_| front_error)
    }
}
