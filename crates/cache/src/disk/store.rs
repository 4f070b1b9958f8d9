use super::raw::{RawDiskStore, WriteMode};
use crate::serial::SerialStorage;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::Arc;
use tierstore_core::{Fetch, Modify, Result, Store, StorageName, Update};

static SHARED: Lazy<Arc<DiskStore>> = Lazy::new(|| Arc::new(DiskStore::new()));

/// Queue-serialized disk engine.
///
/// Every fetch, store and update issued through one instance runs in order,
/// so an update is never interleaved with another operation on the same
/// instance. Separate instances over the same files are not coordinated.
/// Use [`DiskStore::shared`] when independent components must serialize
/// against each other.
pub struct DiskStore {
    raw: SerialStorage<RawDiskStore>,
}

impl DiskStore {
    #[must_use]
    pub fn new() -> Self {
        Self::from_raw(RawDiskStore::new())
    }

    #[must_use]
    pub fn with_options(create_directories: bool, write_mode: WriteMode) -> Self {
        Self::from_raw(RawDiskStore::with_options(create_directories, write_mode))
    }

    fn from_raw(raw: RawDiskStore) -> Self {
        Self {
            raw: SerialStorage::new(raw),
        }
    }

    /// Process-wide instance with default options
    pub fn shared() -> Arc<DiskStore> {
        Arc::clone(&SHARED)
    }

    /// Operations queued or running
    pub fn waiting(&self) -> usize {
        self.raw.waiting()
    }
}

impl Default for DiskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageName for DiskStore {
    fn storage_name(&self) -> String {
        self.raw.inner().storage_name()
    }
}

#[async_trait]
impl Fetch<PathBuf, Vec<u8>> for DiskStore {
    async fn fetch(&self, path: &PathBuf) -> Result<Vec<u8>> {
        self.raw.fetch(path).await
    }
}

#[async_trait]
impl Store<PathBuf, Vec<u8>> for DiskStore {
    async fn store(&self, path: &PathBuf, value: &Vec<u8>) -> Result<()> {
        self.raw.store(path, value).await
    }
}

#[async_trait]
impl Update<PathBuf, Vec<u8>> for DiskStore {
    async fn update(&self, path: &PathBuf, modify: Modify<Vec<u8>>) -> Result<Vec<u8>> {
        self.raw.update(path, modify).await
    }
}
