//! Trailing-edge debouncer.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::subscription::Subscription;

/// Runs only the most recently scheduled task, `delay` after it was scheduled.
///
/// Scheduling again, or calling [`Debouncer::cancel`], aborts whatever was
/// pending, including a task that already started running.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<Subscription>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let next = Subscription::spawn("debounce", async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(next);
        drop(previous);
    }

    pub fn cancel(&self) {
        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(previous);
    }
}
