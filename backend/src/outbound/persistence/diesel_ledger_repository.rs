//! PostgreSQL-backed `LedgerRepository` implementation.
//!
//! Each operation is one transaction. Rows are read with `SELECT ... FOR
//! UPDATE`: the listing first for purchases, then every involved account in
//! ascending key order, so two operations sharing an account queue behind each
//! other instead of deadlocking. The locked snapshots are handed to the
//! domain ledger rules and the resulting [`Settlement`] is written back before
//! commit.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use mockable::Clock;

use crate::domain::ports::{LedgerPersistenceError, LedgerRepository};
use crate::domain::{
    Account, CreditOutcome, Product, PurchaseOrder, PurchaseOutcome, PurchaseRejection,
    Settlement, TransferOrder, TransferOutcome, TransferRejection, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AccountRow, NewNotificationRow, ProductRow};
use super::pool::{DbPool, PoolError};
use super::schema::{accounts, notifications, products};

/// Diesel-backed implementation of the ledger port.
#[derive(Clone)]
pub struct DieselLedgerRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselLedgerRepository {
    /// Create a repository stamping emitted notifications with `clock`.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> LedgerPersistenceError {
    map_basic_pool_error(error, |message| LedgerPersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> LedgerPersistenceError {
    map_basic_diesel_error(
        error,
        LedgerPersistenceError::query,
        LedgerPersistenceError::connection,
    )
}

/// Lock the accounts owned by `owners`, lowest key first.
async fn lock_accounts(
    conn: &mut AsyncPgConnection,
    owners: &[UserId],
) -> QueryResult<Vec<Account>> {
    let keys: Vec<i32> = owners.iter().map(|owner| owner.get()).collect();
    let rows: Vec<AccountRow> = accounts::table
        .filter(accounts::user_id.eq_any(keys))
        .order(accounts::id.asc())
        .for_update()
        .select(AccountRow::as_select())
        .load(conn)
        .await?;
    Ok(rows.into_iter().map(Account::from).collect())
}

/// The lowest-keyed account owned by `owner` among `locked`.
fn owned_by(locked: &[Account], owner: UserId) -> Option<Account> {
    locked
        .iter()
        .find(|account| account.user_id() == owner)
        .cloned()
}

async fn apply_settlement(
    conn: &mut AsyncPgConnection,
    settlement: &Settlement,
    now: DateTime<Utc>,
) -> QueryResult<()> {
    for change in settlement.changes() {
        diesel::update(accounts::table.find(change.account_id.get()))
            .set(accounts::balance.eq(accounts::balance + change.delta))
            .execute(conn)
            .await?;
    }

    if let Some(product) = settlement.removed_listing() {
        diesel::delete(products::table.find(product.get()))
            .execute(conn)
            .await?;
    }

    if let Some(note) = settlement.notification() {
        diesel::insert_into(notifications::table)
            .values(&NewNotificationRow {
                message: note.message(),
                user_id: note.recipient().map(UserId::get),
                created_at: now,
            })
            .execute(conn)
            .await?;
    }

    Ok(())
}

#[async_trait]
impl LedgerRepository for DieselLedgerRepository {
    async fn transfer(
        &self,
        order: &TransferOrder,
    ) -> Result<TransferOutcome, LedgerPersistenceError> {
        let now = self.clock.utc();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let locked = lock_accounts(conn, &[order.sender(), order.target()]).await?;
                let Some(sender) = owned_by(&locked, order.sender()) else {
                    return Ok(TransferOutcome::Rejected(TransferRejection::UnknownSender));
                };
                let target = owned_by(&locked, order.target());

                match order.settle(&sender, target.as_ref()) {
                    Ok(settlement) => {
                        apply_settlement(conn, &settlement, now).await?;
                        Ok(TransferOutcome::Completed {
                            sender_balance: sender.balance()
                                + settlement.net_change_for(sender.id()),
                        })
                    }
                    Err(reason) => Ok(TransferOutcome::Rejected(reason)),
                }
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn purchase(
        &self,
        order: &PurchaseOrder,
    ) -> Result<PurchaseOutcome, LedgerPersistenceError> {
        let now = self.clock.utc();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let listing = products::table
                    .find(order.product().get())
                    .for_update()
                    .select(ProductRow::as_select())
                    .first::<ProductRow>(conn)
                    .await
                    .optional()?;
                let Some(product) = listing.map(Product::from) else {
                    return Ok(PurchaseOutcome::Rejected(PurchaseRejection::ListingGone));
                };

                let locked = lock_accounts(conn, &[order.buyer(), product.seller_id()]).await?;
                let Some(buyer) = owned_by(&locked, order.buyer()) else {
                    return Ok(PurchaseOutcome::Rejected(PurchaseRejection::UnknownBuyer));
                };
                let seller = owned_by(&locked, product.seller_id());

                match order.settle(&buyer, &product, seller.as_ref()) {
                    Ok(settlement) => {
                        apply_settlement(conn, &settlement, now).await?;
                        Ok(PurchaseOutcome::Completed {
                            price: product.price(),
                            seller_credited: seller.is_some(),
                        })
                    }
                    Err(reason) => Ok(PurchaseOutcome::Rejected(reason)),
                }
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn credit(
        &self,
        user: UserId,
        amount: f64,
    ) -> Result<CreditOutcome, LedgerPersistenceError> {
        let now = self.clock.utc();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let locked = lock_accounts(conn, &[user]).await?;
                let Some(account) = owned_by(&locked, user) else {
                    return Ok(CreditOutcome::UnknownAccount);
                };

                let settlement = Settlement::credit(&account, amount);
                apply_settlement(conn, &settlement, now).await?;
                Ok(CreditOutcome::Credited {
                    balance: account.balance() + settlement.net_change_for(account.id()),
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
