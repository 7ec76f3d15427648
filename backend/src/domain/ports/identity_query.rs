//! Driving port for resolving session identities and listing users.
//!
//! Every protected route resolves the session's user key through this port
//! before doing anything else.

use async_trait::async_trait;

use crate::domain::{Error, Identity, User, UserId};

/// Domain use-case port for identity lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityQuery: Send + Sync {
    /// Resolve a session user key into the user and their account.
    ///
    /// Returns `Ok(None)` when the key no longer names a user, or the user
    /// has no account; callers treat both as unauthenticated.
    async fn resolve(&self, user: UserId) -> Result<Option<Identity>, Error>;

    /// Every registered user, ordered by key.
    async fn list_users(&self) -> Result<Vec<User>, Error>;
}
