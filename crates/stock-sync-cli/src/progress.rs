//! Progress bar utilities for CLI operations

use indicatif::{ProgressBar, ProgressStyle};
use stock_sync_common::SyncJob;

/// Create a percentage bar for following a sync job
pub fn create_job_progress(job_id: &str) -> ProgressBar {
    let pb = ProgressBar::new(100);
    let style = ProgressStyle::default_bar()
        .template("{prefix:.bold} {spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_prefix(job_id.to_string());
    pb
}

/// Move the bar to the snapshot's position; never moves backwards
pub fn apply_snapshot(pb: &ProgressBar, job: &SyncJob) {
    let percent = u64::from(job.percent.min(100));
    if percent > pb.position() {
        pb.set_position(percent);
    }
    pb.set_message(job.message.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_follows_snapshots_forward_only() {
        let pb = create_job_progress("sync_abc");
        let mut job = SyncJob::new("sync_abc", false);

        job.percent = 40;
        job.message = "Syncing products... 10 updated, 0 skipped".to_string();
        apply_snapshot(&pb, &job);
        assert_eq!(pb.position(), 40);
        assert_eq!(pb.message(), "Syncing products... 10 updated, 0 skipped");

        job.percent = 30;
        apply_snapshot(&pb, &job);
        assert_eq!(pb.position(), 40);

        assert_eq!(pb.length(), Some(100));
    }
}
