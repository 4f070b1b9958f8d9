//! Cache-chain combinators composing a front tier with a back tier.
//!
//! | combinator    | fetch                            | store           |
//! |---------------|----------------------------------|-----------------|
//! | `Backed`      | front, else back + write-back    | front only      |
//! | `ReadThrough` | front, else back                 | -               |
//! | `Combined`    | as `Backed`                      | front, then back|
//! | `Pushing`     | -                                | front, then back|
//!
//! A front miss in a read-through surfaces the front error when the back
//! misses too. Dual writes stop at the first failing tier and never roll
//! back a tier that already succeeded.

mod backed;
mod combined;
mod pushing;

pub use backed::{Backed, ReadThrough};
pub use combined::Combined;
pub use pushing::Pushing;

use tierstore_core::{Result, Store, StorageError, StorageKey, StorageName, StorageValue, Tier};

/// Write `value` to `front`, then to `back`, naming the failing tier
pub(crate) async fn store_both<K, V, F, B>(
    storage: &impl StorageName,
    front: &F,
    back: &B,
    key: &K,
    value: &V,
) -> Result<()>
where
    K: StorageKey,
    V: StorageValue,
    F: Store<K, V>,
    B: Store<K, V>,
{
    front
        .store(key, value)
        .await
        .map_err(|e| StorageError::composition(storage.storage_name(), Tier::Front, e))?;
    back.store(key, value)
        .await
        .map_err(|e| StorageError::composition(storage.storage_name(), Tier::Back, e))
}
