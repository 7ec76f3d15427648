//! Driving port for the notification read path.

use async_trait::async_trait;

use crate::domain::{Error, Notification, UserId};

/// Domain use-case port for reading notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationFeed: Send + Sync {
    /// Broadcasts plus the viewer's personal notifications, newest first.
    async fn visible_to(&self, viewer: UserId) -> Result<Vec<Notification>, Error>;
}
