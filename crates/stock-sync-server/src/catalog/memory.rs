//! In-process catalog

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use stock_sync_common::StockStatus;
use tokio::sync::RwLock;

use super::{Catalog, CatalogError, Product, ProductRef};

#[derive(Default)]
struct Inner {
    products: BTreeMap<ProductRef, Product>,
    next_id: ProductRef,
    unloadable: HashSet<ProductRef>,
    failing_saves: HashSet<ProductRef>,
}

/// Map-backed catalog that records how the engine used it
#[derive(Default)]
pub struct MemoryCatalog {
    inner: RwLock<Inner>,
    saves: AtomicUsize,
    cache_drops: AtomicUsize,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with `(sku, quantity)` pairs, ids assigned in order from 1
    pub async fn with_products<I, S>(products: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<i64>)>,
        S: Into<String>,
    {
        let catalog = Self::new();
        for (sku, quantity) in products {
            catalog.insert(sku, quantity).await;
        }
        catalog
    }

    pub async fn insert(&self, sku: impl Into<String>, stock_quantity: Option<i64>) -> ProductRef {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let id = inner.next_id;
        let stock_status = StockStatus::from_quantity(stock_quantity.unwrap_or(0));
        inner.products.insert(
            id,
            Product {
                id,
                sku: sku.into(),
                stock_quantity,
                stock_status,
            },
        );
        id
    }

    /// First product carrying `sku`
    pub async fn product_by_sku(&self, sku: &str) -> Option<Product> {
        let inner = self.inner.read().await;
        inner.products.values().find(|p| p.sku == sku).cloned()
    }

    /// Make `get` report the product as missing while it stays listed
    pub async fn make_unloadable(&self, id: ProductRef) {
        self.inner.write().await.unloadable.insert(id);
    }

    /// Make every `save` of this product fail
    pub async fn fail_saves_for(&self, id: ProductRef) {
        self.inner.write().await.failing_saves.insert(id);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn cache_drops(&self) -> usize {
        self.cache_drops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn find_by_sku(&self, sku: &str) -> Result<Option<ProductRef>, CatalogError> {
        let inner = self.inner.read().await;
        Ok(inner.products.values().find(|p| p.sku == sku).map(|p| p.id))
    }

    async fn list_skus(&self) -> Result<Vec<(String, ProductRef)>, CatalogError> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .values()
            .map(|p| (p.sku.clone(), p.id))
            .collect())
    }

    async fn get(&self, id: ProductRef) -> Result<Option<Product>, CatalogError> {
        let inner = self.inner.read().await;
        if inner.unloadable.contains(&id) {
            return Ok(None);
        }
        Ok(inner.products.get(&id).cloned())
    }

    async fn save(&self, product: &Product) -> Result<(), CatalogError> {
        let mut inner = self.inner.write().await;
        if inner.failing_saves.contains(&product.id) {
            return Err(CatalogError::Unavailable(format!(
                "refusing to save product {}",
                product.id
            )));
        }
        let stored = inner
            .products
            .get_mut(&product.id)
            .ok_or(CatalogError::NotFound(product.id))?;
        stored.stock_quantity = product.stock_quantity;
        stored.stock_status = product.stock_status;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn drop_cache(&self) {
        self.cache_drops.fetch_add(1, Ordering::SeqCst);
    }
}
