//! Catalog backed by the `products` table

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;
use stock_sync_common::StockStatus;
use tokio::sync::Mutex;

use super::{Catalog, CatalogError, Product, ProductRef};

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    sku: String,
    stock_quantity: Option<i64>,
    stock_status: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = CatalogError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let stock_status = row
            .stock_status
            .parse::<StockStatus>()
            .map_err(CatalogError::InvalidRow)?;
        Ok(Product {
            id: row.id,
            sku: row.sku,
            stock_quantity: row.stock_quantity,
            stock_status,
        })
    }
}

/// SQL catalog with a read cache that lives until the next `drop_cache`
pub struct SqliteCatalog {
    pool: SqlitePool,
    cache: Mutex<HashMap<ProductRef, Product>>,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Add a product row; returns its id
    #[tracing::instrument(skip(self))]
    pub async fn insert(
        &self,
        sku: &str,
        stock_quantity: Option<i64>,
    ) -> Result<ProductRef, CatalogError> {
        let status = StockStatus::from_quantity(stock_quantity.unwrap_or(0));
        let result = sqlx::query(
            r#"
            INSERT INTO products (sku, stock_quantity, stock_status, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(sku)
        .bind(stock_quantity)
        .bind(status.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn cached_len(&self) -> usize {
        self.cache.lock().await.len()
    }
}

#[async_trait]
impl Catalog for SqliteCatalog {
    #[tracing::instrument(skip(self))]
    async fn find_by_sku(&self, sku: &str) -> Result<Option<ProductRef>, CatalogError> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM products WHERE sku = ? ORDER BY id LIMIT 1",
        )
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    async fn list_skus(&self) -> Result<Vec<(String, ProductRef)>, CatalogError> {
        let pairs = sqlx::query_as::<_, (String, i64)>(
            "SELECT sku, id FROM products WHERE TRIM(sku) <> '' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = pairs.len(), "Listed catalog SKUs");
        Ok(pairs)
    }

    async fn get(&self, id: ProductRef) -> Result<Option<Product>, CatalogError> {
        let mut cache = self.cache.lock().await;
        if let Some(product) = cache.get(&id) {
            return Ok(Some(product.clone()));
        }

        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, sku, stock_quantity, stock_status FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let product = Product::try_from(row)?;
                cache.insert(id, product.clone());
                Ok(Some(product))
            }
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self, product), fields(product_id = product.id, sku = %product.sku))]
    async fn save(&self, product: &Product) -> Result<(), CatalogError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = ?, stock_status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(product.stock_quantity)
        .bind(product.stock_status.as_str())
        .bind(Utc::now())
        .bind(product.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(product.id));
        }

        self.cache.lock().await.insert(product.id, product.clone());
        Ok(())
    }

    async fn drop_cache(&self) {
        self.cache.lock().await.clear();
    }
}
