//! Cancellable timers and a value debouncer built on them.
//!
//! Both need a running tokio runtime.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A scheduled callback. Cancelling before it fires discards it.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Runs `callback` once `delay` has elapsed, unless cancelled first.
pub fn schedule<F>(delay: Duration, callback: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        callback();
    });

    TimerHandle { task }
}

/// Publishes the latest pushed value once pushes have been quiet for `delay`.
///
/// Every push restarts the timer, so a burst collapses into its final value.
/// Values equal to the current stable value are not re-published.
pub struct Debouncer<T> {
    delay: Duration,
    stable: Arc<watch::Sender<T>>,
    pending: Mutex<Option<TimerHandle>>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            stable: Arc::new(watch::Sender::new(initial)),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn push(&self, value: T) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = pending.take() {
            timer.cancel();
        }

        let stable = Arc::clone(&self.stable);
        *pending = Some(schedule(self.delay, move || {
            stable.send_if_modified(|current| {
                if *current == value {
                    return false;
                }
                *current = value;
                true
            });
        }));
    }

    /// The last settled value.
    pub fn current(&self) -> T {
        self.stable.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.stable.subscribe()
    }

    /// Drops the pending value, if any. The stable value is untouched.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = pending.take() {
            timer.cancel();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = pending.take() {
            timer.cancel();
        }
    }
}
