//! Port for balance-mutating operations.
//!
//! Each method is one unit of work: the adapter locks every account row it
//! reads, asks the ledger rules in [`crate::domain::ledger`] for a
//! [`Settlement`](crate::domain::Settlement), applies it, and releases the
//! locks. Two operations touching the same account never interleave.

use async_trait::async_trait;

use crate::domain::{
    CreditOutcome, PurchaseOrder, PurchaseOutcome, TransferOrder, TransferOutcome, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ledger adapters. Rejections are outcomes, not errors.
    pub enum LedgerPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "ledger connection failed: {message}",
        /// Query or mutation failed; the unit of work was rolled back.
        Query { message: String } => "ledger query failed: {message}",
    }
}

/// Serialized ledger mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Move funds between two users' accounts and notify the target.
    async fn transfer(
        &self,
        order: &TransferOrder,
    ) -> Result<TransferOutcome, LedgerPersistenceError>;

    /// Settle a listing purchase.
    async fn purchase(
        &self,
        order: &PurchaseOrder,
    ) -> Result<PurchaseOutcome, LedgerPersistenceError>;

    /// Add `amount` to the account of `user` without a counterpart.
    async fn credit(
        &self,
        user: UserId,
        amount: f64,
    ) -> Result<CreditOutcome, LedgerPersistenceError>;
}
