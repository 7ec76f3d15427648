//! Driving port for self-service registration.

use async_trait::async_trait;

use crate::domain::{Error, Registration, User};

/// Result of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// User and account were created.
    Registered(User),
    /// The login id is taken; nothing was created.
    LoginTaken,
}

/// Domain use-case port for creating users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create a user together with its account.
    async fn register(&self, registration: &Registration) -> Result<RegistrationOutcome, Error>;
}
