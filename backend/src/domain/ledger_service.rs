//! Marketplace and transfer use-cases.
//!
//! The service validates what it can without stored state, hands the order
//! to the [`LedgerRepository`] for settlement, and logs the outcome.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    LedgerPersistenceError, LedgerRepository, MarketplaceService, ProductPersistenceError,
    ProductRepository, TransferService,
};
use crate::domain::{
    Error, Identity, NewListing, Product, ProductId, PurchaseOrder, PurchaseOutcome,
    TransferOrder, TransferOutcome, UserId,
};

/// Ledger service implementing the marketplace and transfer ports.
#[derive(Clone)]
pub struct LedgerService<P, L> {
    products: Arc<P>,
    ledger: Arc<L>,
}

impl<P, L> LedgerService<P, L> {
    /// Create a new service with the given repositories.
    pub fn new(products: Arc<P>, ledger: Arc<L>) -> Self {
        Self { products, ledger }
    }
}

pub(crate) fn map_ledger_error(error: LedgerPersistenceError) -> Error {
    match error {
        LedgerPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("ledger unavailable: {message}"))
        }
        LedgerPersistenceError::Query { message } => {
            Error::internal(format!("ledger error: {message}"))
        }
    }
}

fn map_product_error(error: ProductPersistenceError) -> Error {
    match error {
        ProductPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("product repository unavailable: {message}"))
        }
        ProductPersistenceError::Query { message } => {
            Error::internal(format!("product repository error: {message}"))
        }
    }
}

#[async_trait]
impl<P, L> MarketplaceService for LedgerService<P, L>
where
    P: ProductRepository,
    L: LedgerRepository,
{
    async fn listings(&self) -> Result<Vec<Product>, Error> {
        self.products.list().await.map_err(map_product_error)
    }

    async fn sell(&self, seller: &Identity, listing: NewListing) -> Result<Product, Error> {
        let product = self
            .products
            .create(&listing.listed_by(seller))
            .await
            .map_err(map_product_error)?;
        info!(
            product_id = %product.id(),
            seller_id = %product.seller_id(),
            price = product.price(),
            "listing created"
        );
        Ok(product)
    }

    async fn buy(&self, buyer: &Identity, product: ProductId) -> Result<PurchaseOutcome, Error> {
        let order = PurchaseOrder::new(buyer, product);
        let outcome = self
            .ledger
            .purchase(&order)
            .await
            .map_err(map_ledger_error)?;
        match outcome {
            PurchaseOutcome::Completed {
                price,
                seller_credited: true,
            } => info!(
                buyer_id = %order.buyer(),
                product_id = %product,
                price,
                "purchase settled"
            ),
            PurchaseOutcome::Completed {
                price,
                seller_credited: false,
            } => warn!(
                buyer_id = %order.buyer(),
                product_id = %product,
                price,
                "purchase settled but seller has no account; price was not credited"
            ),
            PurchaseOutcome::Rejected(reason) => {
                debug!(
                    buyer_id = %order.buyer(),
                    product_id = %product,
                    %reason,
                    "purchase declined"
                );
            }
        }
        Ok(outcome)
    }
}

#[async_trait]
impl<P, L> TransferService for LedgerService<P, L>
where
    P: ProductRepository,
    L: LedgerRepository,
{
    async fn transfer(
        &self,
        sender: &Identity,
        target: UserId,
        amount: f64,
    ) -> Result<TransferOutcome, Error> {
        let order = TransferOrder::new(sender, target, amount);
        if let Err(reason) = order.precheck() {
            debug!(
                sender_id = %order.sender(),
                target_id = %target,
                amount,
                %reason,
                "transfer declined"
            );
            return Ok(TransferOutcome::Rejected(reason));
        }
        let outcome = self
            .ledger
            .transfer(&order)
            .await
            .map_err(map_ledger_error)?;
        match outcome {
            TransferOutcome::Completed { sender_balance } => info!(
                sender_id = %order.sender(),
                target_id = %target,
                amount,
                sender_balance,
                "transfer settled"
            ),
            TransferOutcome::Rejected(reason) => {
                debug!(
                    sender_id = %order.sender(),
                    target_id = %target,
                    amount,
                    %reason,
                    "transfer declined"
                );
            }
        }
        Ok(outcome)
    }
}
