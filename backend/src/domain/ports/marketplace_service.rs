//! Driving port for the marketplace: browse, sell and buy.

use async_trait::async_trait;

use crate::domain::{Error, Identity, NewListing, Product, ProductId, PurchaseOutcome};

/// Domain use-case port for listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketplaceService: Send + Sync {
    /// Every listing still for sale. No ownership filter is applied.
    async fn listings(&self) -> Result<Vec<Product>, Error>;

    /// List an item; seller name and key come from `seller`.
    async fn sell(&self, seller: &Identity, listing: NewListing) -> Result<Product, Error>;

    /// Buy a listing. Missing listings and short balances are outcomes.
    async fn buy(&self, buyer: &Identity, product: ProductId) -> Result<PurchaseOutcome, Error>;
}
