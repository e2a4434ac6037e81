//! Terminal rendering of job snapshots and run history

use colored::{ColoredString, Colorize};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use stock_sync_common::{JobStatus, LogEntry, SyncJob};

/// Coloured status word
pub fn status_label(status: JobStatus) -> ColoredString {
    match status {
        JobStatus::Init => "init".dimmed(),
        JobStatus::Running => "running".yellow(),
        JobStatus::Complete => "complete".green(),
        JobStatus::Error => "error".red(),
    }
}

/// Print one snapshot as a key/value block
pub fn print_job(job_id: &str, job: &SyncJob) {
    println!("{} {}", "Sync job".cyan().bold(), job_id);
    println!("  Status:    {}", status_label(job.status));
    println!("  Step:      {}", job.step);
    println!("  Progress:  {}%", job.percent);
    println!("  Message:   {}", job.message);
    println!(
        "  Rows:      {} processed of {} ({} updated, {} skipped)",
        job.processed, job.total, job.updated, job.skipped
    );
    println!(
        "  Trigger:   {}",
        if job.is_scheduled { "scheduled" } else { "manual" }
    );
    println!("  Updated:   {}", job.updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
}

/// History table, most recent run first
pub fn logs_table(entries: &[LogEntry], limit: Option<usize>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Finished", "Result", "Updated", "Skipped", "Message"]);

    let limit = limit.unwrap_or(entries.len());
    for entry in entries.iter().rev().take(limit) {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            if entry.success { "ok" } else { "failed" }.to_string(),
            entry.updated.to_string(),
            entry.skipped.to_string(),
            entry.message.clone(),
        ]);
    }

    table
}
