//! Feed reconciliation pipeline
//!
//! `fetch -> parse -> index -> apply`, driven by [`ReconciliationEngine`]:
//!
//! - [`fetcher`]: bounded HTTP GET of the feed body
//! - [`parser`]: delimiter sniffing, header matching, `(sku, quantity)` rows
//! - [`index`]: SKU to product lookup built from one bulk catalog read
//! - [`engine`]: batched apply with progress snapshots and the run history

use serde::{Deserialize, Serialize};
use stock_sync_common::SyncError;

pub mod engine;
pub mod fetcher;
pub mod index;
pub mod parser;

pub use engine::{EngineOptions, ReconciliationEngine, SyncResult};
pub use index::ProductIndex;
pub use parser::FeedRow;

/// Where the feed lives and which columns to read; captured once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfiguration {
    pub url: String,
    /// Matched case-insensitively against the trimmed header
    pub sku_column: String,
    pub stock_column: String,
    pub verify_tls: bool,
}

impl FeedConfiguration {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_columns(mut self, sku_column: impl Into<String>, stock_column: impl Into<String>) -> Self {
        self.sku_column = sku_column.into();
        self.stock_column = stock_column.into();
        self
    }

    pub fn validate(&self) -> Result<(), SyncError> {
        if self.url.trim().is_empty() {
            return Err(SyncError::config("CSV URL is not configured."));
        }
        if self.sku_column.trim().is_empty() || self.stock_column.trim().is_empty() {
            return Err(SyncError::config("SKU and stock column names must be configured."));
        }
        Ok(())
    }
}

impl Default for FeedConfiguration {
    fn default() -> Self {
        Self {
            url: String::new(),
            sku_column: "sku".to_string(),
            stock_column: "stock".to_string(),
            verify_tls: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_url() {
        let err = FeedConfiguration::new("  ").validate().unwrap_err();
        assert_eq!(err, SyncError::config("CSV URL is not configured."));
    }

    #[test]
    fn test_validate_rejects_blank_columns() {
        let feed = FeedConfiguration::new("https://feeds.example.com/stock.csv").with_columns("", "stock");
        assert!(feed.validate().unwrap_err().is_configuration_problem());
    }

    #[test]
    fn test_defaults() {
        let feed = FeedConfiguration::default();
        assert_eq!(feed.sku_column, "sku");
        assert_eq!(feed.stock_column, "stock");
        assert!(feed.verify_tls);
    }
}
