//! Port for reading accounts.
//!
//! Balance mutations never go through this port; they are settled by
//! [`LedgerRepository`](super::LedgerRepository).

use async_trait::async_trait;

use crate::domain::{Account, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "account repository query failed: {message}",
    }
}

/// Read access to accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Account owned by `user`, taking the lowest key if several exist.
    async fn find_by_user(&self, user: UserId) -> Result<Option<Account>, AccountPersistenceError>;
}
