//! Broadcast and personal notifications.
//!
//! A notification without a recipient is a broadcast visible to everyone;
//! one with a recipient is visible only to that user. Records are immutable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{NotificationId, UserId};

/// Currency label used in ledger messages.
pub const CURRENCY: &str = "GMR";

/// Longest message the store keeps; longer text is truncated on write.
pub const NOTIFICATION_MESSAGE_MAX: usize = 500;

/// Stored notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[schema(value_type = i32)]
    id: NotificationId,
    message: String,
    #[schema(value_type = Option<i32>)]
    recipient: Option<UserId>,
    created_at: DateTime<Utc>,
}

impl Notification {
    /// Snapshot a stored notification.
    pub fn new(
        id: NotificationId,
        message: impl Into<String>,
        recipient: Option<UserId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            message: message.into(),
            recipient,
            created_at,
        }
    }

    /// Notification key.
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Owning user, or `None` for broadcasts.
    pub fn recipient(&self) -> Option<UserId> {
        self.recipient
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether `viewer` may see this notification.
    pub fn is_visible_to(&self, viewer: UserId) -> bool {
        self.recipient.is_none_or(|owner| owner == viewer)
    }
}

/// Notification waiting to be stored; the store stamps key and time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    message: String,
    recipient: Option<UserId>,
}

impl NewNotification {
    /// Notification shown to every user.
    pub fn broadcast(message: impl Into<String>) -> Self {
        Self {
            message: clip(message.into()),
            recipient: None,
        }
    }

    /// Notification shown only to `recipient`.
    pub fn personal(recipient: UserId, message: impl Into<String>) -> Self {
        Self {
            message: clip(message.into()),
            recipient: Some(recipient),
        }
    }

    /// Tell a transfer recipient who paid them.
    ///
    /// # Examples
    /// ```
    /// use bazaar::domain::{NewNotification, UserId};
    ///
    /// let note = NewNotification::transfer_received(UserId::new(2), "Ada", 200.0);
    /// assert_eq!(note.message(), "Transfer: Ada sent you 200 GMR");
    /// ```
    pub fn transfer_received(recipient: UserId, sender_name: &str, amount: f64) -> Self {
        Self::personal(
            recipient,
            format!("Transfer: {sender_name} sent you {amount} {CURRENCY}"),
        )
    }

    /// Tell a seller that their listing sold.
    pub fn listing_sold(recipient: UserId, title: &str, price: f64, buyer_name: &str) -> Self {
        Self::personal(
            recipient,
            format!("Item '{title}' sold! +{price} {CURRENCY} from {buyer_name}"),
        )
    }

    /// Message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Owning user, or `None` for broadcasts.
    pub fn recipient(&self) -> Option<UserId> {
        self.recipient
    }

    /// Materialise the stored record.
    pub fn into_notification(self, id: NotificationId, created_at: DateTime<Utc>) -> Notification {
        Notification::new(id, self.message, self.recipient, created_at)
    }
}

fn clip(mut message: String) -> String {
    if let Some((cut, _)) = message.char_indices().nth(NOTIFICATION_MESSAGE_MAX) {
        message.truncate(cut);
    }
    message
}

/// Order notifications newest first, breaking timestamp ties by key.
pub fn sort_newest_first(notifications: &mut [Notification]) {
    notifications.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
