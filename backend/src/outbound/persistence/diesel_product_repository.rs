//! PostgreSQL-backed `ProductRepository` implementation using Diesel ORM.
//!
//! Listings are only inserted and read here; deletion happens inside the
//! purchase transaction of the ledger adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProductPersistenceError, ProductRepository};
use crate::domain::{NewProduct, Product};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewProductRow, ProductRow};
use super::pool::{DbPool, PoolError};
use super::schema::products;

/// Diesel-backed implementation of the listing port.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProductPersistenceError {
    map_basic_pool_error(error, |message| ProductPersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> ProductPersistenceError {
    map_basic_diesel_error(
        error,
        ProductPersistenceError::query,
        ProductPersistenceError::connection,
    )
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn list(&self) -> Result<Vec<Product>, ProductPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProductRow> = products::table
            .order(products::id.asc())
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, ProductPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(products::table)
            .values(&NewProductRow::from(product))
            .returning(ProductRow::as_returning())
            .get_result::<ProductRow>(&mut conn)
            .await
            .map(Product::from)
            .map_err(map_diesel_error)
    }
}
