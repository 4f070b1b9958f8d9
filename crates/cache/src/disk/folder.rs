//! Logical-name storage rooted at one directory

use super::filename::{EncodeFilename, Filename};
use super::store::DiskStore;
use crate::config::DiskConfig;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tierstore_core::{Fetch, Modify, Result, Store, StorageError, StorageName, Update};
use tierstore_utils::BaseDirectory;
use tracing::{debug, warn};

/// Path-keyed engine a folder store delegates to
pub type SharedDisk = Arc<dyn Update<PathBuf, Vec<u8>>>;

/// Maps logical file names onto files directly under `root`.
///
/// Names pass through the configured encoder; an encoded name that is empty,
/// `.`, `..` or contains a path separator is rejected with `InvalidKey`, so
/// no key can address a file outside the root.
pub struct DiskFolderStore {
    root: PathBuf,
    name: String,
    disk: SharedDisk,
    encoder: Arc<dyn EncodeFilename>,
    clear_on_drop: bool,
}

impl DiskFolderStore {
    /// Folder store over the process-wide [`DiskStore`]
    pub fn new(root: impl Into<PathBuf>, encoder: impl EncodeFilename + 'static) -> Self {
        Self::with_disk(root, DiskStore::shared(), encoder)
    }

    /// Folder store over a caller-supplied disk engine
    pub fn with_disk(
        root: impl Into<PathBuf>,
        disk: SharedDisk,
        encoder: impl EncodeFilename + 'static,
    ) -> Self {
        let root = root.into();
        let name = match root.file_name() {
            Some(folder) => format!("disk-{}", folder.to_string_lossy()),
            None => format!("disk-{}", root.display()),
        };
        Self {
            root,
            name,
            disk,
            encoder: Arc::new(encoder),
            clear_on_drop: false,
        }
    }

    /// Folder `name` under a standard base directory
    pub fn in_base_directory(
        name: &str,
        base: BaseDirectory,
        encoder: impl EncodeFilename + 'static,
    ) -> Self {
        Self::new(base.path().join(name), encoder)
    }

    /// Build a folder store with its own disk engine from `config`
    pub fn from_config(config: &DiskConfig) -> Result<Self> {
        config.validate()?;
        let disk = Arc::new(DiskStore::with_options(
            config.create_directories,
            config.write_mode,
        ));
        Ok(Self::with_disk(config.root(), disk, config.encoding)
            .clearing_on_drop(config.clear_on_drop))
    }

    /// Remove the whole folder, best effort, when this store is dropped
    #[must_use]
    pub fn clearing_on_drop(mut self, clear: bool) -> Self {
        self.clear_on_drop = clear;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the file backing `name`
    pub fn file_path(&self, name: &str) -> Result<PathBuf> {
        let encoded = self.encoder.encode(name);
        let reason = if encoded.is_empty() {
            Some("encodes to an empty file name")
        } else if encoded == "." || encoded == ".." {
            Some("encodes to a relative directory reference")
        } else if encoded.contains(['/', '\\', '\0']) {
            Some("encodes to a name containing a path separator")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(StorageError::invalid_key(&name, reason)),
            None => Ok(self.root.join(encoded)),
        }
    }

    /// Delete the folder and everything in it. A missing folder is not an error.
    pub async fn clear(&self) -> Result<()> {
        debug!(root = %self.root.display(), "clearing folder");
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(self.root.clone(), "remove directory", e)),
        }
    }

    async fn fetch_named(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.file_path(name)?;
        self.disk.fetch(&path).await
    }

    async fn store_named(&self, name: &str, value: &Vec<u8>) -> Result<()> {
        let path = self.file_path(name)?;
        self.disk.store(&path, value).await
    }

    async fn update_named(&self, name: &str, modify: Modify<Vec<u8>>) -> Result<Vec<u8>> {
        let path = self.file_path(name)?;
        self.disk.update(&path, modify).await
    }
}

impl Drop for DiskFolderStore {
    fn drop(&mut self) {
        if !self.clear_on_drop {
            return;
        }
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => debug!(root = %self.root.display(), "cleared folder on drop"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(error) => {
                warn!(root = %self.root.display(), %error, "failed to clear folder on drop");
            }
        }
    }
}

impl StorageName for DiskFolderStore {
    fn storage_name(&self) -> String {
        self.name.clone()
    }
}

#[async_trait]
impl Fetch<Filename, Vec<u8>> for DiskFolderStore {
    async fn fetch(&self, key: &Filename) -> Result<Vec<u8>> {
        self.fetch_named(key.as_str()).await
    }
}

#[async_trait]
impl Store<Filename, Vec<u8>> for DiskFolderStore {
    async fn store(&self, key: &Filename, value: &Vec<u8>) -> Result<()> {
        self.store_named(key.as_str(), value).await
    }
}

#[async_trait]
impl Update<Filename, Vec<u8>> for DiskFolderStore {
    async fn update(&self, key: &Filename, modify: Modify<Vec<u8>>) -> Result<Vec<u8>> {
        self.update_named(key.as_str(), modify).await
    }
}

#[async_trait]
impl Fetch<String, Vec<u8>> for DiskFolderStore {
    async fn fetch(&self, key: &String) -> Result<Vec<u8>> {
        self.fetch_named(key).await
    }
}

#[async_trait]
impl Store<String, Vec<u8>> for DiskFolderStore {
    async fn store(&self, key: &String, value: &Vec<u8>) -> Result<()> {
        self.store_named(key, value).await
    }
}

#[async_trait]
impl Update<String, Vec<u8>> for DiskFolderStore {
    async fn update(&self, key: &String, modify: Modify<Vec<u8>>) -> Result<Vec<u8>> {
        self.update_named(key, modify).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::FilenameEncoding;
    use proptest::prelude::*;
    use tempfile::TempDir;
    use tierstore_core::UpdateExt;

    fn folder(temp: &TempDir, encoding: FilenameEncoding) -> DiskFolderStore {
        DiskFolderStore::with_disk(
            temp.path().join("things"),
            Arc::new(DiskStore::new()),
            encoding,
        )
    }

    #[tokio::test]
    async fn test_names_map_to_encoded_files() {
        let temp = TempDir::new().unwrap();
        let store = folder(&temp, FilenameEncoding::Hex);

        store
            .store(&Filename::from("a/b"), &b"value".to_vec())
            .await
            .unwrap();

        let expected = temp.path().join("things").join("612f62");
        assert_eq!(std::fs::read(&expected).unwrap(), b"value");
        assert_eq!(store.file_path("a/b").unwrap(), expected);
        assert_eq!(store.storage_name(), "disk-things");
    }

    #[tokio::test]
    async fn test_string_and_filename_keys_agree() {
        let temp = TempDir::new().unwrap();
        let store = folder(&temp, FilenameEncoding::Base64Url);

        store
            .store(&"notes".to_string(), &b"hi".to_vec())
            .await
            .unwrap();

        assert_eq!(store.fetch(&Filename::from("notes")).await.unwrap(), b"hi");
        let err = Fetch::<String, Vec<u8>>::fetch(&store, &"other".to_string())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_through_folder() {
        let temp = TempDir::new().unwrap();
        let store = folder(&temp, FilenameEncoding::Sha256);
        let key = Filename::from("count");
        store.store(&key, &vec![0]).await.unwrap();

        let updated = store
            .update_with(&key, |bytes: &mut Vec<u8>| bytes[0] += 1)
            .await
            .unwrap();

        assert_eq!(updated, vec![1]);
    }

    #[tokio::test]
    async fn test_raw_encoder_cannot_escape_root() {
        let temp = TempDir::new().unwrap();
        let store = folder(&temp, FilenameEncoding::Raw);

        for bad in ["", ".", "..", "../escape", "nested/name"] {
            let err = store
                .store(&Filename::from(bad), &b"x".to_vec())
                .await
                .unwrap_err();
            assert!(
                matches!(err, StorageError::InvalidKey { .. }),
                "{bad:?} was accepted"
            );
        }
        assert!(!temp.path().join("escape").exists());
    }

    #[tokio::test]
    async fn test_custom_encoder() {
        let temp = TempDir::new().unwrap();
        let store = DiskFolderStore::with_disk(
            temp.path(),
            Arc::new(DiskStore::new()),
            |name: &str| format!("{name}.json"),
        );

        store
            .store(&Filename::from("config"), &b"{}".to_vec())
            .await
            .unwrap();

        assert!(temp.path().join("config.json").is_file());
    }

    #[tokio::test]
    async fn test_clear_removes_folder() {
        let temp = TempDir::new().unwrap();
        let store = folder(&temp, FilenameEncoding::Hex);
        store
            .store(&Filename::from("x"), &b"1".to_vec())
            .await
            .unwrap();

        store.clear().await.unwrap();
        assert!(!store.root().exists());

        // Already gone
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_clear_on_drop() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("things");
        {
            let store = folder(&temp, FilenameEncoding::Hex).clearing_on_drop(true);
            store
                .store(&Filename::from("x"), &b"1".to_vec())
                .await
                .unwrap();
            assert!(root.is_dir());
        }
        assert!(!root.exists());

        let kept = folder(&temp, FilenameEncoding::Hex);
        kept.store(&Filename::from("y"), &b"2".to_vec())
            .await
            .unwrap();
        drop(kept);
        assert!(root.is_dir());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_stored_bytes_fetch_back_exactly(
            entries in proptest::collection::hash_map(
                ".{1,16}",
                proptest::collection::vec(any::<u8>(), 0..256),
                1..8,
            ),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let temp = TempDir::new().unwrap();
            let store = folder(&temp, FilenameEncoding::Base64Url);

            rt.block_on(async {
                for (name, bytes) in &entries {
                    store.store(name, bytes).await.unwrap();
                }
                for (name, bytes) in &entries {
                    prop_assert_eq!(&store.fetch(name).await.unwrap(), bytes);
                }
                Ok(())
            })?;
        }
    }
}
