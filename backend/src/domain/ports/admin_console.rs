//! Driving port for administrator actions.
//!
//! Implementations refuse callers whose `is_admin` flag is unset with an
//! [`ErrorCode::Forbidden`](crate::domain::ErrorCode) error, even though the
//! HTTP layer already gates the route.

use async_trait::async_trait;

use crate::domain::{CreditOutcome, Error, Notification, User, UserId};

/// Domain use-case port for the admin console.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminConsole: Send + Sync {
    /// Publish a broadcast notification.
    async fn post_news(&self, actor: &User, text: &str) -> Result<Notification, Error>;

    /// Add `amount` to a user's balance; the amount is not range-checked.
    async fn credit(
        &self,
        actor: &User,
        user: UserId,
        amount: f64,
    ) -> Result<CreditOutcome, Error>;

    /// Grant the admin flag; returns `false` when the user is unknown.
    async fn promote(&self, actor: &User, user: UserId) -> Result<bool, Error>;
}
