//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::{Account, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::AccountRow;
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel-backed implementation of the account read port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountPersistenceError {
    map_basic_pool_error(error, |message| AccountPersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> AccountPersistenceError {
    map_basic_diesel_error(
        error,
        AccountPersistenceError::query,
        AccountPersistenceError::connection,
    )
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_by_user(&self, user: UserId) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = accounts::table
            .filter(accounts::user_id.eq(user.get()))
            .order(accounts::id.asc())
            .select(AccountRow::as_select())
            .first::<AccountRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(Account::from))
    }
}
