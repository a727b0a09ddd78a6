//! Scoped background tasks.
//!
//! A [`Subscription`] owns a spawned task and aborts it when dropped, so
//! listeners registered when a screen activates go away with it however the
//! screen is torn down.

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug)]
pub struct Subscription {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Spawns `task` on the current tokio runtime.
    pub fn spawn<F>(name: &'static str, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        debug!(subscription = name, "acquired");
        Self {
            name,
            handle: tokio::spawn(task),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `false` once the task has returned or been aborted.
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Waits for the task to return on its own.
    pub async fn join(mut self) {
        let _ = (&mut self.handle).await;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!(subscription = self.name, "released");
        }
        self.handle.abort();
    }
}
