//! Shared building blocks for tierstore
//!
//! The synchronization primitives every stateful tier is built on, plus the
//! filesystem and logging helpers used by the disk engine.

pub mod atomic_file;
pub mod sync;
pub mod tracing;
pub mod xdg;

pub use atomic_file::*;
pub use sync::*;
pub use xdg::*;
