//! Common types shared by the sync server and the CLI

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier of one sync run (`sync_<32 hex chars>`)
pub type JobId = String;

/// Lifecycle status of a sync job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Init,
    Running,
    Complete,
    Error,
}

impl JobStatus {
    /// `complete` and `error` are final; nothing may change a job after them
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Error)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Init => write!(f, "init"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Complete => write!(f, "complete"),
            JobStatus::Error => write!(f, "error"),
        }
    }
}

/// Pipeline step a job is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStep {
    #[default]
    Init,
    Fetch,
    Parse,
    Mapping,
    Sync,
    Complete,
}

impl std::fmt::Display for JobStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStep::Init => write!(f, "init"),
            JobStep::Fetch => write!(f, "fetch"),
            JobStep::Parse => write!(f, "parse"),
            JobStep::Mapping => write!(f, "mapping"),
            JobStep::Sync => write!(f, "sync"),
            JobStep::Complete => write!(f, "complete"),
        }
    }
}

/// Derived availability flag written next to the stock quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "instock", alias = "in_stock")]
    InStock,
    #[serde(rename = "outofstock", alias = "out_of_stock")]
    OutOfStock,
}

impl StockStatus {
    /// `instock` iff the quantity is strictly positive
    pub fn from_quantity(quantity: i64) -> Self {
        if quantity > 0 {
            StockStatus::InStock
        } else {
            StockStatus::OutOfStock
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StockStatus::InStock => "instock",
            StockStatus::OutOfStock => "outofstock",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "instock" | "in_stock" => Ok(StockStatus::InStock),
            "outofstock" | "out_of_stock" => Ok(StockStatus::OutOfStock),
            other => Err(format!("Invalid stock status: {}", other)),
        }
    }
}

/// Progress snapshot of one sync job, as returned to polling clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncJob {
    pub id: JobId,
    pub status: JobStatus,
    pub step: JobStep,
    /// 0..=100, never decreases while the job is live
    pub percent: u8,
    pub message: String,
    pub updated: u64,
    pub skipped: u64,
    pub total: u64,
    pub processed: u64,
    /// Started by the periodic scheduler rather than by an operator
    pub is_scheduled: bool,
    pub updated_at: DateTime<Utc>,
}

impl SyncJob {
    /// Fresh snapshot in `init` state
    pub fn new(id: impl Into<JobId>, is_scheduled: bool) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Init,
            step: JobStep::Init,
            percent: 0,
            message: String::new(),
            updated: 0,
            skipped: 0,
            total: 0,
            processed: 0,
            is_scheduled,
            updated_at: Utc::now(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Overlay the fields present in `update` onto this snapshot.
    ///
    /// Absent fields keep their previous values. `percent` is clamped to
    /// 100 and, while the job is not terminal, never moves backwards.
    pub fn apply(&mut self, update: SyncJobUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(step) = update.step {
            self.step = step;
        }
        if let Some(percent) = update.percent {
            let percent = percent.min(100);
            if self.status.is_terminal() || percent >= self.percent {
                self.percent = percent;
            }
        }
        if let Some(message) = update.message {
            self.message = message;
        }
        if let Some(updated) = update.updated {
            self.updated = updated;
        }
        if let Some(skipped) = update.skipped {
            self.skipped = skipped;
        }
        if let Some(total) = update.total {
            self.total = total;
        }
        if let Some(processed) = update.processed {
            self.processed = processed;
        }
        self.updated_at = Utc::now();
    }
}

/// Partial snapshot used for merge-updates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncJobUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<JobStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed: Option<u64>,
}

impl SyncJobUpdate {
    /// Running update for a pipeline step
    pub fn step(step: JobStep, percent: u8, message: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Running),
            step: Some(step),
            percent: Some(percent),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Terminal failure carrying only the message
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Error),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_counts(mut self, updated: u64, skipped: u64, total: u64, processed: u64) -> Self {
        self.updated = Some(updated);
        self.skipped = Some(skipped);
        self.total = Some(total);
        self.processed = Some(processed);
        self
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Whether applying this update makes the job terminal
    pub fn is_terminal(&self) -> bool {
        self.status.map(JobStatus::is_terminal).unwrap_or(false)
    }
}

/// Outcome of a completed run, kept in the bounded history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub message: String,
    pub updated: u64,
    pub skipped: u64,
    /// Sample of per-row problems (unknown SKUs, unloadable products)
    #[serde(default)]
    pub errors: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_from_quantity() {
        assert_eq!(StockStatus::from_quantity(15), StockStatus::InStock);
        assert_eq!(StockStatus::from_quantity(1), StockStatus::InStock);
        assert_eq!(StockStatus::from_quantity(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_quantity(-3), StockStatus::OutOfStock);
    }

    #[test]
    fn test_stock_status_serde_accepts_aliases() {
        let status: StockStatus = serde_json::from_str("\"in_stock\"").unwrap();
        assert_eq!(status, StockStatus::InStock);
        let status: StockStatus = serde_json::from_str("\"outofstock\"").unwrap();
        assert_eq!(status, StockStatus::OutOfStock);
        assert_eq!(serde_json::to_string(&StockStatus::InStock).unwrap(), "\"instock\"");
        assert_eq!("OUT_OF_STOCK".parse::<StockStatus>().unwrap(), StockStatus::OutOfStock);
    }

    #[test]
    fn test_apply_overlays_only_present_fields() {
        let mut job = SyncJob::new("sync_a", true);
        job.apply(SyncJobUpdate::step(JobStep::Mapping, 30, "Loading product database...").with_total(12));
        job.apply(SyncJobUpdate {
            message: Some("still mapping".to_string()),
            ..Default::default()
        });

        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.step, JobStep::Mapping);
        assert_eq!(job.percent, 30);
        assert_eq!(job.total, 12);
        assert_eq!(job.message, "still mapping");
        assert!(job.is_scheduled);
        assert_eq!(job.id, "sync_a");
    }

    #[test]
    fn test_apply_keeps_percent_monotonic() {
        let mut job = SyncJob::new("sync_b", false);
        job.apply(SyncJobUpdate::step(JobStep::Sync, 65, "syncing"));
        job.apply(SyncJobUpdate::step(JobStep::Sync, 40, "late update"));
        assert_eq!(job.percent, 65);

        job.apply(SyncJobUpdate::step(JobStep::Sync, 250, "overflow"));
        assert_eq!(job.percent, 100);
    }

    #[test]
    fn test_job_status_terminal() {
        assert!(!JobStatus::Init.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Complete.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(SyncJobUpdate::failed("boom").is_terminal());
    }

    #[test]
    fn test_log_entry_defaults_missing_errors() {
        let json = r#"{
            "timestamp": "2024-05-01T10:00:00Z",
            "success": true,
            "message": "Stock sync completed. Updated: 2, Skipped: 1",
            "updated": 2,
            "skipped": 1
        }"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert!(entry.errors.is_empty());
        assert_eq!(entry.updated, 2);
    }
}
