//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Identity, LoginCredentials, Registration, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The login identifier is already registered.
        DuplicateLogin { login_id: String } => "login id already registered: {login_id}",
    }
}

/// Storage for users, including the registration unit of work.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user and its account as one unit.
    ///
    /// The adapter decides `is_admin` with
    /// [`admin_on_registration`](crate::domain::admin_on_registration) from
    /// the user count observed inside the same unit, and seeds the account
    /// with [`DEFAULT_BALANCE`](crate::domain::DEFAULT_BALANCE). Either both
    /// rows exist afterwards or neither does.
    async fn register(&self, registration: &Registration) -> Result<Identity, UserPersistenceError>;

    /// Fetch the user whose login id and password both match exactly.
    async fn find_by_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by key.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Every user, ordered by key.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Set `is_admin` on a user; returns `false` when the user is unknown.
    async fn promote(&self, id: UserId) -> Result<bool, UserPersistenceError>;
}
