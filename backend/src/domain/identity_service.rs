//! Login, registration and identity resolution.
//!
//! [`IdentityService`] implements the account-facing driving ports on top of
//! the user and account repositories.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AccountPersistenceError, AccountRepository, IdentityQuery, LoginService, RegistrationOutcome,
    RegistrationService, UserPersistenceError, UserRepository,
};
use crate::domain::{Error, Identity, LoginCredentials, Registration, User, UserId};

/// Identity service implementing login, registration and session resolution.
#[derive(Clone)]
pub struct IdentityService<U, A> {
    users: Arc<U>,
    accounts: Arc<A>,
}

impl<U, A> IdentityService<U, A> {
    /// Create a new service with the given repositories.
    pub fn new(users: Arc<U>, accounts: Arc<A>) -> Self {
        Self { users, accounts }
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateLogin { login_id } => {
            Error::conflict(format!("login id already registered: {login_id}"))
        }
    }
}

fn map_account_error(error: AccountPersistenceError) -> Error {
    match error {
        AccountPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountPersistenceError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
    }
}

#[async_trait]
impl<U, A> LoginService for IdentityService<U, A>
where
    U: UserRepository,
    A: AccountRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let user = self
            .users
            .find_by_credentials(credentials)
            .await
            .map_err(map_user_error)?;
        match user {
            Some(user) => {
                info!(user_id = %user.id(), "user logged in");
                Ok(user.id())
            }
            None => {
                debug!(login_id = %credentials.login_id(), "login declined");
                Err(Error::unauthorized("invalid credentials"))
            }
        }
    }
}

#[async_trait]
impl<U, A> RegistrationService for IdentityService<U, A>
where
    U: UserRepository,
    A: AccountRepository,
{
    async fn register(&self, registration: &Registration) -> Result<RegistrationOutcome, Error> {
        match self.users.register(registration).await {
            Ok(identity) => {
                let user = identity.user().clone();
                info!(
                    user_id = %user.id(),
                    account_id = %identity.account().id(),
                    is_admin = user.is_admin(),
                    "user registered"
                );
                Ok(RegistrationOutcome::Registered(user))
            }
            Err(UserPersistenceError::DuplicateLogin { login_id }) => {
                debug!(%login_id, "registration declined: login id taken");
                Ok(RegistrationOutcome::LoginTaken)
            }
            Err(err) => Err(map_user_error(err)),
        }
    }
}

#[async_trait]
impl<U, A> IdentityQuery for IdentityService<U, A>
where
    U: UserRepository,
    A: AccountRepository,
{
    async fn resolve(&self, user: UserId) -> Result<Option<Identity>, Error> {
        let Some(found) = self.users.find_by_id(user).await.map_err(map_user_error)? else {
            return Ok(None);
        };
        let account = self
            .accounts
            .find_by_user(user)
            .await
            .map_err(map_account_error)?;
        match account {
            Some(account) => Ok(Some(Identity::new(found, account))),
            None => {
                warn!(user_id = %user, "user has no account; treating session as anonymous");
                Ok(None)
            }
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_user_error)
    }
}
