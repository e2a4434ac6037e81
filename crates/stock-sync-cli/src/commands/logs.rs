//! `stock-sync logs` command implementation
//!
//! Shows the bounded run history, most recent run first.

use crate::api::ApiClient;
use crate::error::Result;
use crate::output::logs_table;
use colored::Colorize;

/// Show the run history
pub async fn run(server_url: String, limit: Option<usize>) -> Result<()> {
    let client = ApiClient::new(server_url)?;

    let entries = client.list_logs().await?;

    if entries.is_empty() {
        println!("No sync runs recorded yet.");
        return Ok(());
    }

    println!("{}", "Sync History:".cyan().bold());
    println!("{}", logs_table(&entries, limit));

    // Per-row problems of the latest run
    if let Some(latest) = entries.last() {
        if !latest.errors.is_empty() {
            println!();
            println!("{}", "Latest run notes:".yellow().bold());
            for error in &latest.errors {
                println!("  - {}", error);
            }
        }
    }

    Ok(())
}
