//! Whole-file read and write primitive

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tierstore_core::{Fetch, Result, Store, StorageError, StorageName};
use tierstore_utils::{write_atomic, AtomicWriteError};
use tokio::fs;
use tracing::trace;

/// How file contents are replaced on store.
///
/// `InPlace` truncates and rewrites the target. A crash mid-write can leave a
/// torn file behind. `Atomic` writes a temporary sibling, syncs it and renames
/// it over the target, so readers see the old or the new content only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    #[default]
    InPlace,
    Atomic,
}

impl FromStr for WriteMode {
    type Err = StorageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in-place" | "in_place" => Ok(Self::InPlace),
            "atomic" => Ok(Self::Atomic),
            other => Err(StorageError::configuration(format!(
                "unknown write mode '{other}' (expected in-place or atomic)"
            ))),
        }
    }
}

/// Path-keyed byte storage over the local filesystem.
///
/// Offers no serialization of its own; wrap it in a
/// [`DiskStore`](super::DiskStore) before sharing it between callers.
#[derive(Debug, Clone, Copy)]
pub struct RawDiskStore {
    create_directories: bool,
    write_mode: WriteMode,
}

impl RawDiskStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(true, WriteMode::InPlace)
    }

    #[must_use]
    pub fn with_options(create_directories: bool, write_mode: WriteMode) -> Self {
        Self {
            create_directories,
            write_mode,
        }
    }

    async fn ensure_parent(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };
        if !self.create_directories {
            return Ok(());
        }
        fs::create_dir_all(parent)
            .await
            .map_err(|e| StorageError::directory_creation(parent, e))
    }
}

impl Default for RawDiskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageName for RawDiskStore {
    fn storage_name(&self) -> String {
        "disk".to_string()
    }
}

#[async_trait]
impl Fetch<PathBuf, Vec<u8>> for RawDiskStore {
    async fn fetch(&self, path: &PathBuf) -> Result<Vec<u8>> {
        trace!(path = %path.display(), "reading file");
        match fs::read(path).await {
            Ok(bytes) => Ok(bytes),
            // A file where a parent directory should be means nothing was written here
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                Err(StorageError::not_found(self.storage_name(), path))
            }
            Err(e) => Err(StorageError::io(path.clone(), "read", e)),
        }
    }
}

#[async_trait]
impl Store<PathBuf, Vec<u8>> for RawDiskStore {
    async fn store(&self, path: &PathBuf, value: &Vec<u8>) -> Result<()> {
        trace!(
            path = %path.display(),
            bytes = value.len(),
            mode = ?self.write_mode,
            "writing file"
        );
        self.ensure_parent(path).await?;

        match self.write_mode {
            WriteMode::InPlace => fs::write(path, value)
                .await
                .map_err(|e| StorageError::file_creation(path.clone(), e)),
            WriteMode::Atomic => write_atomic(path, value).await.map_err(|e| match e {
                AtomicWriteError::Temporary { path, source } => {
                    StorageError::file_creation(path, source)
                }
                other => StorageError::file_creation(path.clone(), other.into_io()),
            }),
        }
    }
}
