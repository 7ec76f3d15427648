//! Port for notification storage.

use async_trait::async_trait;

use crate::domain::{NewNotification, Notification, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notification repository query failed: {message}",
    }
}

/// Append-only notification storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Store a notification, stamping its key and creation time.
    async fn post(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, NotificationPersistenceError>;

    /// Broadcasts plus notifications owned by `viewer`, in any order.
    async fn visible_to(
        &self,
        viewer: UserId,
    ) -> Result<Vec<Notification>, NotificationPersistenceError>;
}
