//! Product catalog seam
//!
//! The reconciliation engine only needs a narrow view of the store that owns
//! products: resolve SKUs, load a product, write its stock fields back and
//! release whatever the adapter cached along the way. Everything else about
//! products is out of reach on purpose.
//!
//! Two adapters ship with the server:
//!
//! - [`MemoryCatalog`]: in-process map, used by tests and embedders
//! - [`SqliteCatalog`]: the `products` table behind the bundled database

use async_trait::async_trait;
use stock_sync_common::StockStatus;
use thiserror::Error;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryCatalog;
pub use sqlite::SqliteCatalog;

/// Opaque product identifier handed out by the catalog
pub type ProductRef = i64;

/// Stock-relevant slice of a catalog product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductRef,
    pub sku: String,
    /// `None` while the catalog does not manage stock for this product
    pub stock_quantity: Option<i64>,
    pub stock_status: StockStatus,
}

impl Product {
    pub fn set_stock(&mut self, quantity: i64, status: StockStatus) {
        self.stock_quantity = Some(quantity);
        self.stock_status = status;
    }
}

/// Catalog adapter failures
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Product {0} not found")]
    NotFound(ProductRef),

    #[error("Invalid product row: {0}")]
    InvalidRow(String),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Key-value view of the product store, keyed by SKU
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Point lookup of one SKU
    async fn find_by_sku(&self, sku: &str) -> Result<Option<ProductRef>, CatalogError>;

    /// Every `(sku, product)` pair, in one bulk read
    async fn list_skus(&self) -> Result<Vec<(String, ProductRef)>, CatalogError>;

    async fn get(&self, id: ProductRef) -> Result<Option<Product>, CatalogError>;

    /// Persist the stock fields of `product`
    async fn save(&self, product: &Product) -> Result<(), CatalogError>;

    /// Release per-item state accumulated since the last call
    async fn drop_cache(&self);
}
