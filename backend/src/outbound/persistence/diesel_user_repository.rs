//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Registration runs as one transaction: the `users` table is locked against
//! concurrent inserts so the user count that decides the administrator flag
//! cannot race, then the user and its account are inserted together.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Account, DEFAULT_BALANCE, Identity, LoginCredentials, Registration, User, UserId,
    UserValidationError, admin_on_registration,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AccountRow, NewAccountRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{accounts, users};

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, |message| UserPersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn map_row_error(error: UserValidationError) -> UserPersistenceError {
    UserPersistenceError::query(format!("stored user failed validation: {error}"))
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    row.into_domain().map_err(map_row_error)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn register(&self, registration: &Registration) -> Result<Identity, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let inserted = conn
            .transaction(|conn| {
                async move {
                    diesel::sql_query("LOCK TABLE users IN SHARE ROW EXCLUSIVE MODE")
                        .execute(conn)
                        .await?;

                    let existing: i64 = users::table.count().get_result(conn).await?;
                    let new_user = NewUserRow {
                        login_id: registration.login_id().as_ref(),
                        password: registration.password(),
                        display_name: registration.display_name().as_ref(),
                        is_admin: admin_on_registration(existing),
                    };

                    let user_row = diesel::insert_into(users::table)
                        .values(&new_user)
                        .on_conflict(users::login_id)
                        .do_nothing()
                        .returning(UserRow::as_returning())
                        .get_result::<UserRow>(conn)
                        .await
                        .optional()?;

                    let Some(user_row) = user_row else {
                        return Ok(None);
                    };

                    let account_row = diesel::insert_into(accounts::table)
                        .values(&NewAccountRow {
                            user_id: user_row.id,
                            balance: DEFAULT_BALANCE,
                        })
                        .returning(AccountRow::as_returning())
                        .get_result::<AccountRow>(conn)
                        .await?;

                    Ok(Some((user_row, account_row)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let Some((user_row, account_row)) = inserted else {
            debug!(login_id = %registration.login_id(), "login id already registered");
            return Err(UserPersistenceError::duplicate_login(
                registration.login_id().as_ref(),
            ));
        };

        let user = row_to_user(user_row)?;
        Ok(Identity::new(user, Account::from(account_row)))
    }

    async fn find_by_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(
                users::login_id
                    .eq(credentials.login_id().as_ref())
                    .and(users::password.eq(credentials.password())),
            )
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn promote(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(users::table.find(id.get()))
            .set(users::is_admin.eq(true))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }
}
