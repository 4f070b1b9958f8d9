//! Filesystem-backed storage.
//!
//! Three layers, each usable on its own:
//!
//! - [`RawDiskStore`]: whole-file reads and writes keyed by path, creating
//!   missing parent directories on store
//! - [`DiskStore`]: the raw store behind a serial queue, adding an atomic
//!   `update`
//! - [`DiskFolderStore`]: logical names mapped to files under one root

mod filename;
mod folder;
mod raw;
mod store;

pub use filename::{EncodeFilename, Filename, FilenameEncoding};
pub use folder::{DiskFolderStore, SharedDisk};
pub use raw::{RawDiskStore, WriteMode};
pub use store::DiskStore;
