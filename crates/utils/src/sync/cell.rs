use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Mutual-exclusion slot owning exactly one value.
///
/// Only the task currently holding the cell may read or mutate the value.
/// Waiters are served in the order they started waiting, and a waiter that
/// gives up (its future is dropped) leaves the line without disturbing the
/// others.
pub struct ExclusiveCell<T> {
    slot: Arc<Mutex<T>>,
}

impl<T> ExclusiveCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            slot: Arc::new(Mutex::new(value)),
        }
    }

    /// Snapshot of the current value
    pub async fn get(&self) -> T
    where
        T: Clone,
    {
        self.slot.lock().await.clone()
    }

    /// Replace the value
    pub async fn set(&self, value: T) {
        *self.slot.lock().await = value;
    }

    /// Run `f` with exclusive mutable access and hand back whatever it returns.
    ///
    /// Failures are delivered by returning a `Result` from `f`.
    pub async fn run<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.slot.lock().await;
        f(&mut *guard)
    }

    /// Take ownership of the cell until the returned guard is dropped.
    ///
    /// The guard is `'static`, so it can travel into a spawned task.
    pub async fn acquire(&self) -> OwnedMutexGuard<T> {
        Arc::clone(&self.slot).lock_owned().await
    }

    pub fn into_inner(self) -> Option<T> {
        Arc::try_unwrap(self.slot).ok().map(Mutex::into_inner)
    }
}

impl<T: Default> Default for ExclusiveCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for ExclusiveCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExclusiveCell")
            .field("held", &self.slot.try_lock().is_err())
            .finish()
    }
}
