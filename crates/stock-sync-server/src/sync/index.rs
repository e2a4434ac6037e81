//! In-memory SKU lookup for one run

use std::collections::HashMap;
use stock_sync_common::{Result, SyncError};

use crate::catalog::{Catalog, ProductRef};

/// SKU to product map built from a single bulk read of the catalog, so the
/// apply loop never issues one lookup per feed row
#[derive(Debug, Default, Clone)]
pub struct ProductIndex {
    by_sku: HashMap<String, ProductRef>,
}

impl ProductIndex {
    #[tracing::instrument(skip(catalog))]
    pub async fn build(catalog: &dyn Catalog) -> Result<Self> {
        let pairs = catalog
            .list_skus()
            .await
            .map_err(|e| SyncError::catalog(e.to_string()))?;

        let index = Self::from_pairs(pairs);
        tracing::debug!(skus = index.len(), "Built product index");
        Ok(index)
    }

    /// Blank SKUs are left out; the first product listed for a SKU wins
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, ProductRef)>,
        S: AsRef<str>,
    {
        let mut by_sku = HashMap::new();
        for (sku, id) in pairs {
            let sku = sku.as_ref().trim();
            if sku.is_empty() {
                continue;
            }
            by_sku.entry(sku.to_string()).or_insert(id);
        }
        Self { by_sku }
    }

    pub fn lookup(&self, sku: &str) -> Option<ProductRef> {
        self.by_sku.get(sku).copied()
    }

    pub fn len(&self) -> usize {
        self.by_sku.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sku.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;

    #[test]
    fn test_blank_skus_are_excluded() {
        let index = ProductIndex::from_pairs([("A1", 1), ("", 2), ("   ", 3)]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("A1"), Some(1));
        assert_eq!(index.lookup(""), None);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let index = ProductIndex::from_pairs([("A1", 7), ("A1", 9), (" A2 ", 4)]);
        assert_eq!(index.lookup("A1"), Some(7));
        assert_eq!(index.lookup("A2"), Some(4));
    }

    #[tokio::test]
    async fn test_build_reads_catalog_once() {
        let catalog = MemoryCatalog::with_products([("A1", Some(1)), ("A3", None)]).await;
        let index = ProductIndex::build(&catalog).await.unwrap();

        assert_eq!(index.lookup("A1"), Some(1));
        assert_eq!(index.lookup("A3"), Some(2));
        assert_eq!(index.lookup("A2"), None);
    }
}
