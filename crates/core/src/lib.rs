//! Capability contracts and the error taxonomy shared by every tierstore tier.
//!
//! ## Key Components
//!
//! - **`errors`**: the `StorageError` enum and `Result` alias. Every failure a
//!   tier can produce is a value of this type; nothing in the workspace aborts
//!   the process.
//! - **`traits`**: the `Fetch` / `Store` / `Update` capabilities, the
//!   diagnostic `StorageName`, and the key/value marker traits.

pub mod errors;
pub mod traits;

pub use self::{
    errors::{Result, StorageError, Tier},
    traits::{Fetch, Modify, Store, StorageKey, StorageName, StorageValue, Update, UpdateExt},
};
