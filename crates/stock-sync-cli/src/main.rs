//! Stock Sync CLI - Main entry point

use clap::Parser;
use std::process;
use stock_sync_cli::{Cli, Commands};
use stock_sync_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use tracing::error;

#[tokio::main]
async fn main() {
    // `.env` must be loaded before clap reads STOCK_SYNC_SERVER_URL
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Verbose mode logs debug to the console; otherwise only warnings
    let log_config = LogConfig::builder()
        .level(if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        })
        .output(LogOutput::Console)
        .log_file_prefix("stock-sync-cli")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging
    let _log_guard = init_logging(&log_config).ok();

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> stock_sync_cli::Result<()> {
    let server_url = cli.server_url.clone();

    match &cli.command {
        Commands::Start { watch } => stock_sync_cli::commands::start::run(server_url, *watch).await,

        Commands::Progress { job_id } => {
            stock_sync_cli::commands::progress::run(server_url, job_id.clone()).await
        }

        Commands::Watch {
            job_id,
            interval_ms,
        } => stock_sync_cli::commands::watch::run(server_url, job_id.clone(), *interval_ms).await,

        Commands::Active => stock_sync_cli::commands::active::run(server_url).await,

        Commands::Logs { limit } => stock_sync_cli::commands::logs::run(server_url, *limit).await,

        Commands::ClearLogs => stock_sync_cli::commands::clear_logs::run(server_url).await,
    }
}
