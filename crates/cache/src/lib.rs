//! Composable storage tiers for building multi-level caches
//!
//! This crate provides:
//! - A dictionary-backed memory tier with atomic updates
//! - A filesystem tier (raw file I/O, a serialized store, folder mapping)
//! - A serial wrapper that makes read-modify-write atomic for any tier
//! - Cache-chain combinators: backed, read-through, combined, pushing, zip
//! - Capability views and a recovery adapter
//!
//! ```no_run
//! use std::sync::Arc;
//! use tierstore_cache::{DiskFolderStore, FilenameEncoding, MemoryStore, StorageExt};
//! use tierstore_core::Fetch;
//!
//! # async fn run() -> tierstore_core::Result<()> {
//! let memory = Arc::new(MemoryStore::<String, Vec<u8>>::new());
//! let disk = DiskFolderStore::new("/tmp/tiers", FilenameEncoding::Base64Url);
//! let cache = memory.combined_with(disk);
//!
//! let bytes = cache.fetch(&"greeting".to_string()).await?;
//! # let _ = bytes;
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod config;
pub mod disk;
pub mod ext;
pub mod memory;
pub mod recover;
pub mod serial;
pub mod views;
pub mod zip;

pub use chain::{Backed, Combined, Pushing, ReadThrough};
pub use config::{DiskConfig, DiskConfigBuilder};
pub use disk::{
    DiskFolderStore, DiskStore, EncodeFilename, Filename, FilenameEncoding, RawDiskStore,
    WriteMode,
};
pub use ext::StorageExt;
pub use memory::MemoryStore;
pub use recover::{Recovering, Recovery};
pub use serial::SerialStorage;
pub use views::{Composed, ReadOnly, WriteOnly};
pub use zip::{zip, Zip2};

pub use tierstore_core::{
    Fetch, Modify, Result, Store, StorageError, StorageKey, StorageName, StorageValue, Tier,
    Update, UpdateExt,
};
pub use tierstore_utils::BaseDirectory;
