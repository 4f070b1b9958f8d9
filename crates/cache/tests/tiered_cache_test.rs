//! End-to-end scenarios for memory tiers chained in front of disk folders

use serial_test::serial;
use std::sync::Arc;
use tempfile::TempDir;
use tierstore_cache::{
    BaseDirectory, DiskConfig, DiskFolderStore, DiskStore, Fetch, Filename, FilenameEncoding,
    MemoryStore, Store, StorageError, StorageExt, StorageName, Tier, WriteMode,
};

fn folder(temp: &TempDir) -> Arc<DiskFolderStore> {
    Arc::new(DiskFolderStore::with_disk(
        temp.path().join("tier"),
        Arc::new(DiskStore::new()),
        FilenameEncoding::Base64Url,
    ))
}

fn key(name: &str) -> String {
    name.to_string()
}

#[tokio::test]
async fn test_memory_over_disk_read_through_warms_memory() {
    let temp = TempDir::new().unwrap();
    let disk = folder(&temp);
    disk.store(&key("doc"), &b"from disk".to_vec()).await.unwrap();

    let memory = Arc::new(MemoryStore::<String, Vec<u8>>::new());
    let cache = Arc::clone(&memory).combined_with(Arc::clone(&disk));

    assert_eq!(cache.fetch(&key("doc")).await.unwrap(), b"from disk");
    assert_eq!(memory.fetch(&key("doc")).await.unwrap(), b"from disk");
    assert_eq!(cache.storage_name(), "memory<->disk-tier");
}

#[tokio::test]
async fn test_combined_store_persists_to_disk() {
    let temp = TempDir::new().unwrap();
    let disk = folder(&temp);
    let cache = MemoryStore::<String, Vec<u8>>::new().combined_with(Arc::clone(&disk));

    cache.store(&key("a"), &b"x".to_vec()).await.unwrap();

    // A fresh memory tier over the same folder sees the value
    let reopened = MemoryStore::<String, Vec<u8>>::new().backed_by(Arc::clone(&disk));
    assert_eq!(reopened.fetch(&key("a")).await.unwrap(), b"x");
}

#[tokio::test]
async fn test_dual_miss_reports_memory_not_found() {
    let temp = TempDir::new().unwrap();
    let cache = MemoryStore::<String, Vec<u8>>::new().backed_by(folder(&temp));

    let err = cache.fetch(&key("absent")).await.unwrap_err();

    assert!(matches!(err, StorageError::NotFound { ref storage, .. } if storage == "memory"));
}

#[tokio::test]
async fn test_three_tier_chain() {
    let temp = TempDir::new().unwrap();
    let origin = Arc::new(MemoryStore::<String, Vec<u8>>::new());
    origin.store(&key("k"), &b"origin".to_vec()).await.unwrap();

    let disk = folder(&temp);
    let memory = Arc::new(MemoryStore::<String, Vec<u8>>::new());
    let chain = Arc::clone(&memory).backed_by(Arc::clone(&disk).backed_by(Arc::clone(&origin)));

    assert_eq!(chain.fetch(&key("k")).await.unwrap(), b"origin");
    assert_eq!(disk.fetch(&key("k")).await.unwrap(), b"origin");
    assert_eq!(memory.fetch(&key("k")).await.unwrap(), b"origin");
    assert_eq!(chain.storage_name(), "memory<-disk-tier<-memory");
}

#[tokio::test]
async fn test_pushing_failure_names_the_disk_tier() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("blocked"), b"not a directory").unwrap();
    let disk = DiskFolderStore::with_disk(
        temp.path().join("blocked"),
        Arc::new(DiskStore::new()),
        FilenameEncoding::Hex,
    );
    let memory = Arc::new(MemoryStore::<Filename, Vec<u8>>::new());
    let pushing = Arc::clone(&memory).pushing_to(disk);

    let err = pushing
        .store(&Filename::from("f"), &b"v".to_vec())
        .await
        .unwrap_err();

    assert_eq!(err.failed_tier(), Some(Tier::Back));
    assert_eq!(memory.fetch(&Filename::from("f")).await.unwrap(), b"v");
}

#[tokio::test]
async fn test_folder_from_config_with_atomic_writes() {
    let temp = TempDir::new().unwrap();
    let config = DiskConfig::builder()
        .root_dir(temp.path())
        .folder("configured")
        .encoding(FilenameEncoding::Sha256)
        .write_mode(WriteMode::Atomic)
        .build()
        .unwrap();

    let store = DiskFolderStore::from_config(&config).unwrap();
    store
        .store(&key("entry"), &b"payload".to_vec())
        .await
        .unwrap();

    let path = store.file_path("entry").unwrap();
    assert!(path.starts_with(temp.path().join("configured")));
    assert_eq!(std::fs::read(path).unwrap(), b"payload");
}

#[tokio::test]
async fn test_from_config_rejects_invalid_folder() {
    let config = DiskConfig {
        folder: "../outside".to_string(),
        ..DiskConfig::default()
    };

    let result = DiskFolderStore::from_config(&config);

    assert!(matches!(result, Err(StorageError::Configuration { .. })));
}

#[tokio::test]
#[serial]
async fn test_folder_in_cache_base_directory() {
    let temp = TempDir::new().unwrap();
    std::env::set_var("XDG_CACHE_HOME", temp.path());

    let store =
        DiskFolderStore::in_base_directory("app", BaseDirectory::Cache, FilenameEncoding::Hex)
            .clearing_on_drop(true);
    store.store(&key("a"), &b"1".to_vec()).await.unwrap();
    let root = store.root().to_path_buf();
    std::env::remove_var("XDG_CACHE_HOME");

    assert_eq!(root, temp.path().join("app"));
    assert!(root.join("61").is_file());
    drop(store);
    assert!(!root.exists());
}

#[tokio::test]
async fn test_recovery_over_disk_miss() {
    let temp = TempDir::new().unwrap();
    let store = folder(&temp).defaulting(b"fallback".to_vec());

    assert_eq!(
        Fetch::<String, Vec<u8>>::fetch(&store, &key("nothing"))
            .await
            .unwrap(),
        b"fallback"
    );
}
