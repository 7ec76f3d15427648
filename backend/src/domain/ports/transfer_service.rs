//! Driving port for user-to-user transfers.

use async_trait::async_trait;

use crate::domain::{Error, Identity, TransferOutcome, UserId};

/// Domain use-case port for transfers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransferService: Send + Sync {
    /// Move `amount` from the sender's account to the target's account.
    async fn transfer(
        &self,
        sender: &Identity,
        target: UserId,
        amount: f64,
    ) -> Result<TransferOutcome, Error>;
}
