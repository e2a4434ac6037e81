//! Configuration management

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::scheduler::SyncSchedule;
use crate::sync::{engine::DEFAULT_BATCH_SIZE, fetcher::FETCH_TIMEOUT, EngineOptions, FeedConfiguration};

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default database URL; creates the file on first start.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://stock-sync.db?mode=rwc";

/// Default maximum database connections in the pool.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Default database connection timeout in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default CORS allowed origin for local development.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

// ============================================================================
// Sync Configuration Constants
// ============================================================================

/// Default feed column holding the SKU.
pub const DEFAULT_SKU_COLUMN: &str = "sku";

/// Default feed column holding the stock quantity.
pub const DEFAULT_STOCK_COLUMN: &str = "stock";

/// Default delay before the first scheduled run, in seconds.
pub const DEFAULT_INITIAL_DELAY_SECS: u64 = 300;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub sync: SyncConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

/// Feed, batching and schedule settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub feed: FeedConfiguration,
    pub batch_size: usize,
    pub schedule_enabled: bool,
    pub schedule: SyncSchedule,
    pub initial_delay_secs: u64,
}

impl SyncConfig {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            batch_size: self.batch_size,
            fetch_timeout: FETCH_TIMEOUT,
        }
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }
}

/// Parse `key` when set and well-formed, otherwise fall back to `default`
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let schedule = match std::env::var("SYNC_SCHEDULE") {
            Ok(value) => value.parse().map_err(|e: String| anyhow::anyhow!(e))?,
            Err(_) => SyncSchedule::default(),
        };

        let config = Config {
            server: ServerConfig {
                host: env_string("STOCK_SYNC_HOST", DEFAULT_SERVER_HOST),
                port: env_or("STOCK_SYNC_PORT", DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: env_or(
                    "STOCK_SYNC_SHUTDOWN_TIMEOUT",
                    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                ),
            },
            database: DatabaseConfig {
                url: env_string("DATABASE_URL", DEFAULT_DATABASE_URL),
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS),
                connect_timeout_secs: env_or(
                    "DATABASE_CONNECT_TIMEOUT",
                    DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                ),
            },
            cors: CorsConfig {
                allowed_origins: env_string("CORS_ALLOWED_ORIGINS", DEFAULT_CORS_ALLOWED_ORIGIN)
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                allow_credentials: env_or("CORS_ALLOW_CREDENTIALS", true),
            },
            sync: SyncConfig {
                feed: FeedConfiguration {
                    url: env_string("SYNC_CSV_URL", ""),
                    sku_column: env_string("SYNC_SKU_COLUMN", DEFAULT_SKU_COLUMN),
                    stock_column: env_string("SYNC_STOCK_COLUMN", DEFAULT_STOCK_COLUMN),
                    verify_tls: env_or("SYNC_VERIFY_TLS", true),
                },
                batch_size: env_or("SYNC_BATCH_SIZE", DEFAULT_BATCH_SIZE),
                schedule_enabled: env_or("SYNC_SCHEDULE_ENABLED", false),
                schedule,
                initial_delay_secs: env_or("SYNC_INITIAL_DELAY_SECS", DEFAULT_INITIAL_DELAY_SECS),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Database max_connections must be greater than 0");
        }

        if self.sync.batch_size == 0 {
            anyhow::bail!("SYNC_BATCH_SIZE must be greater than 0");
        }

        // An empty feed URL is reported per run, not at startup
        if self.sync.feed.url.trim().is_empty() {
            tracing::warn!("SYNC_CSV_URL is not set - sync runs will fail until it is configured");
        }

        if !self.sync.feed.verify_tls {
            tracing::warn!("TLS verification of the CSV feed is disabled");
        }

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
                connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
            },
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: true,
            },
            sync: SyncConfig {
                feed: FeedConfiguration::default(),
                batch_size: DEFAULT_BATCH_SIZE,
                schedule_enabled: false,
                schedule: SyncSchedule::default(),
                initial_delay_secs: DEFAULT_INITIAL_DELAY_SECS,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.sync.batch_size, 50);
        assert_eq!(config.sync.schedule, SyncSchedule::Hourly);
        assert!(!config.sync.schedule_enabled);
        assert_eq!(config.sync.initial_delay(), Duration::from_secs(300));
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let mut config = Config::default();
        config.sync.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_feed_url_is_not_a_load_error() {
        let config = Config::default();
        assert!(config.sync.feed.url.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_engine_options_carry_batch_size() {
        let mut config = Config::default();
        config.sync.batch_size = 100;
        let options = config.sync.engine_options();
        assert_eq!(options.batch_size, 100);
        assert_eq!(options.fetch_timeout, FETCH_TIMEOUT);
    }
}
