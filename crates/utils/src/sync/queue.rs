use super::cell::ExclusiveCell;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Errors raised by the queue itself rather than by a task
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// The runtime dropped the task before it finished
    #[error("queued task was aborted before completing")]
    Aborted,
}

#[derive(Debug, Default)]
struct QueueState {
    /// Tickets handed out to started tasks
    started: u64,
}

/// FIFO task runner bound to one storage instance.
///
/// Tasks run strictly in submission order and the next task starts only
/// after the previous one has finished, including any awaits inside it.
///
/// A caller that stops waiting before its task starts removes the task from
/// the queue. Once started, a task always runs to completion; if the caller
/// is gone by then its output is dropped.
#[derive(Debug, Default)]
pub struct SerialQueue {
    state: ExclusiveCell<QueueState>,
    waiting: Arc<AtomicUsize>,
}

/// Keeps `waiting` accurate when a caller finishes or gives up
struct WaitingGuard(Arc<AtomicUsize>);

impl WaitingGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for WaitingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SerialQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callers whose task is queued or running
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    /// Enqueue `task`, wait until it has run, and return its output.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn execute<F, T>(&self, task: F) -> Result<T, QueueError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let _waiting = WaitingGuard::enter(&self.waiting);

        // Dropping this future while parked here leaves the line cleanly
        let mut turn = self.state.acquire().await;
        turn.started += 1;
        let ticket = turn.started;

        // From here on the task is detached from the caller: it keeps the
        // queue until it is done even if nobody awaits the handle.
        let handle = tokio::spawn(async move {
            trace!(ticket, "serial task started");
            let output = task.await;
            trace!(ticket, "serial task finished");
            drop(turn);
            output
        });

        match handle.await {
            Ok(output) => Ok(output),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(QueueError::Aborted),
        }
    }
}
