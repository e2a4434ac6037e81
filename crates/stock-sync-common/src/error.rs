//! Error types for stock sync runs
//!
//! Every variant here ends a run: the job snapshot is moved to `error` with the
//! variant's display text as its message. Per-row problems (unknown SKU, a
//! product that fails to load or save) are never represented here; they are
//! counted as skipped.

use thiserror::Error;

/// Result type alias for stock sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Run-terminating failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Feed URL or column names missing or invalid. Not retried.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure while fetching the feed (DNS, TLS, timeout, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// Feed server answered with something other than 200
    #[error("Failed to fetch CSV. Response code: {code}")]
    Http { code: u16 },

    /// Feed body was empty or contained no lines
    #[error("CSV file is empty.")]
    EmptyFeed,

    /// Feed body could not be read as CSV
    #[error("Could not parse CSV data: {0}")]
    InvalidCsv(String),

    /// Configured columns were not present in the header row
    #[error(
        "Could not find required columns. Looking for: \"{sku_column}\" and \"{stock_column}\". Found: {}",
        available_headers.join(", ")
    )]
    ColumnNotFound {
        sku_column: String,
        stock_column: String,
        available_headers: Vec<String>,
    },

    /// Feed parsed but no row carried both columns
    #[error("No valid data found in CSV.")]
    NoData,

    /// The catalog could not be read while building the SKU index
    #[error("Catalog error: {0}")]
    Catalog(String),
}

impl SyncError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Stable machine-readable code for API responses and structured logs
    pub fn code(&self) -> &'static str {
        match self {
            SyncError::Config(_) => "config_error",
            SyncError::Network(_) => "network_error",
            SyncError::Http { .. } => "http_error",
            SyncError::EmptyFeed => "empty_feed",
            SyncError::InvalidCsv(_) => "invalid_csv",
            SyncError::ColumnNotFound { .. } => "column_not_found",
            SyncError::NoData => "no_data",
            SyncError::Catalog(_) => "catalog_error",
        }
    }

    /// Whether the operator has to change settings before a retry can succeed
    pub fn is_configuration_problem(&self) -> bool {
        matches!(self, SyncError::Config(_) | SyncError::ColumnNotFound { .. })
    }
}
