//! `stock-sync clear-logs` command implementation

use crate::api::ApiClient;
use crate::error::Result;
use colored::Colorize;

/// Remove every run history entry
pub async fn run(server_url: String) -> Result<()> {
    let client = ApiClient::new(server_url)?;

    client.clear_logs().await?;
    println!("{} Sync history cleared", "✓".green());

    Ok(())
}
