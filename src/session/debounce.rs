// Cancellable one-shot timer for the real-time debounce.
//
// Arming spawns a tokio task that sleeps for the delay and then runs the
// callback. Cancelling (or dropping the handle) aborts the task, so a callback
// can never run after its handle is gone. Re-arming is cancel-then-schedule:
// the coordinator drops the old handle and stores a new one.

use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};

/// Owned handle to a pending debounce callback.
#[derive(Debug)]
pub struct DebounceTimer {
    handle: JoinHandle<()>,
}

impl DebounceTimer {
    /// Schedule `on_fire` to run once `delay` from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm<F>(delay: Duration, on_fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        // Deadline is fixed here, not when the task first gets polled
        let deadline = Instant::now() + delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            on_fire();
        });
        Self { handle }
    }

    /// Stop the timer. A no-op if it already fired.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// True once the callback has run or the timer was cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
