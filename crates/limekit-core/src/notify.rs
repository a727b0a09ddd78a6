//! Desktop notifications for contract events.
//!
//! Delivery is best effort: a denied permission or a missing notification
//! daemon is logged at debug level and otherwise ignored.

use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use thiserror::Error;
use tracing::debug;

use crate::events::ElectionEvent;
use crate::subscription::Subscription;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification permission denied")]
    PermissionDenied,
    #[error("failed to show notification: {0}")]
    Display(String),
}

/// Something that can show a header/body notification.
pub trait NotificationPort: Send + Sync {
    fn send(&self, header: &str, body: &str) -> Result<(), NotifyError>;
}

/// Desktop notification service.
#[cfg(feature = "notify")]
mod desktop_impl {
    use super::*;
    use notify_rust::Notification;

    #[derive(Debug, Clone, Default)]
    pub struct DesktopNotifier {
        enabled: bool,
    }

    impl DesktopNotifier {
        #[must_use]
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }
    }

    impl NotificationPort for DesktopNotifier {
        fn send(&self, header: &str, body: &str) -> Result<(), NotifyError> {
            if !self.enabled {
                return Err(NotifyError::PermissionDenied);
            }
            Notification::new()
                .summary(header)
                .body(body)
                .appname("limekit")
                .show()
                .map(|_| ())
                .map_err(|e| NotifyError::Display(e.to_string()))
        }
    }
}

/// Stub notification service when the notify feature is disabled.
#[cfg(not(feature = "notify"))]
mod desktop_impl {
    use super::*;

    #[derive(Debug, Clone, Default)]
    pub struct DesktopNotifier {
        _enabled: bool,
    }

    impl DesktopNotifier {
        #[must_use]
        pub fn new(_enabled: bool) -> Self {
            Self { _enabled: false }
        }
    }

    impl NotificationPort for DesktopNotifier {
        fn send(&self, _header: &str, _body: &str) -> Result<(), NotifyError> {
            Err(NotifyError::PermissionDenied)
        }
    }
}

pub use desktop_impl::DesktopNotifier;

/// Shows a notification for every event until the returned subscription is dropped.
pub fn forward_events<S>(events: S, port: Arc<dyn NotificationPort>) -> Subscription
where
    S: Stream<Item = ElectionEvent> + Send + 'static,
{
    Subscription::spawn("election-notifications", async move {
        let mut events = Box::pin(events);
        while let Some(event) = events.next().await {
            let (header, body) = event.notification();
            let port = Arc::clone(&port);
            let shown =
                tokio::task::spawn_blocking(move || port.send(&header, &body)).await;
            match shown {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!("notification not shown: {e}"),
                Err(e) => debug!("notification task failed: {e}"),
            }
        }
    })
}
