//! Port for marketplace listings.

use async_trait::async_trait;

use crate::domain::{NewProduct, Product};

use super::define_port_error;

define_port_error! {
    /// Errors raised by product repository adapters.
    pub enum ProductPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "product repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "product repository query failed: {message}",
    }
}

/// Storage for listings. Removal happens only through a purchase settlement.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every listing still for sale, ordered by key.
    async fn list(&self) -> Result<Vec<Product>, ProductPersistenceError>;

    /// Insert a listing and return the stored record.
    async fn create(&self, product: &NewProduct) -> Result<Product, ProductPersistenceError>;
}
