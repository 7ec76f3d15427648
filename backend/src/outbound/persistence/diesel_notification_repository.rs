//! PostgreSQL-backed `NotificationRepository` implementation using Diesel ORM.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;

use crate::domain::ports::{NotificationPersistenceError, NotificationRepository};
use crate::domain::{NewNotification, Notification, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::notifications;

/// Diesel-backed implementation of the notification port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselNotificationRepository {
    /// Create a repository stamping new rows with `clock`.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> NotificationPersistenceError {
    map_basic_pool_error(error, |message| {
        NotificationPersistenceError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> NotificationPersistenceError {
    map_basic_diesel_error(
        error,
        NotificationPersistenceError::query,
        NotificationPersistenceError::connection,
    )
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn post(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, NotificationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(notifications::table)
            .values(&NewNotificationRow {
                message: notification.message(),
                user_id: notification.recipient().map(UserId::get),
                created_at: self.clock.utc(),
            })
            .returning(NotificationRow::as_returning())
            .get_result::<NotificationRow>(&mut conn)
            .await
            .map(Notification::from)
            .map_err(map_diesel_error)
    }

    async fn visible_to(
        &self,
        viewer: UserId,
    ) -> Result<Vec<Notification>, NotificationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NotificationRow> = notifications::table
            .filter(
                notifications::user_id
                    .is_null()
                    .or(notifications::user_id.eq(viewer.get())),
            )
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Notification::from).collect())
    }
}
