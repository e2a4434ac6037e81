//! Database bootstrap

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::time::Duration;

use crate::config::DatabaseConfig;

/// Open the pool described by `config`.
///
/// In-memory databases exist per connection, so `sqlite::memory:` URLs should
/// be paired with `max_connections = 1`.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect(&config.url)
        .await
}

/// Apply the embedded migrations
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Connect and migrate in one step
pub async fn init(config: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let pool = connect(config).await?;
    migrate(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    Ok(pool)
}
