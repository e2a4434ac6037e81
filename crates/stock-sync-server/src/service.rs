//! Job trigger interface
//!
//! [`SyncService`] is what the HTTP surface, the scheduler and embedders call:
//! it claims jobs through the tracker, hands them to the engine and exposes the
//! read side (progress, active job, history).

use std::sync::Arc;
use stock_sync_common::{JobId, LogEntry, SyncError, SyncJob};
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::jobs::{StateStore, StoreError, SyncJobTracker, SyncLog, TrackerError};
use crate::sync::{EngineOptions, FeedConfiguration, ReconciliationEngine, SyncResult};

/// Result of a start request that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new job was claimed and is running in the background
    Started(JobId),
    /// Scheduled trigger while another job holds the claim
    Skipped { active_job_id: JobId },
}

#[derive(Debug, Error)]
pub enum StartSyncError {
    #[error("A sync is already running: {active_job_id}")]
    AlreadyRunning { active_job_id: JobId },

    #[error("Failed to claim sync job: {0}")]
    Claim(TrackerError),
}

impl From<TrackerError> for StartSyncError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::AlreadyRunning { active_job_id } => {
                StartSyncError::AlreadyRunning { active_job_id }
            }
            other => StartSyncError::Claim(other),
        }
    }
}

/// A job run inline by [`SyncService::run_now`]
#[derive(Debug)]
pub struct CompletedRun {
    pub job_id: JobId,
    pub result: Result<SyncResult, SyncError>,
}

/// Cheap to clone; clones share tracker, log and engine
#[derive(Clone)]
pub struct SyncService {
    tracker: SyncJobTracker,
    log: SyncLog,
    engine: Arc<ReconciliationEngine>,
    feed: Arc<FeedConfiguration>,
}

impl SyncService {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn StateStore>,
        feed: FeedConfiguration,
        options: EngineOptions,
    ) -> Self {
        let tracker = SyncJobTracker::new(store.clone());
        let log = SyncLog::new(store);
        let engine = ReconciliationEngine::new(catalog, tracker.clone(), log.clone(), options);
        Self {
            tracker,
            log,
            engine: Arc::new(engine),
            feed: Arc::new(feed),
        }
    }

    pub fn feed(&self) -> &FeedConfiguration {
        &self.feed
    }

    /// Claim a job and run it in the background.
    ///
    /// A conflicting manual trigger is an error carrying the active job id; a
    /// conflicting scheduled trigger is [`StartOutcome::Skipped`].
    pub async fn start_sync(&self, scheduled: bool) -> Result<StartOutcome, StartSyncError> {
        let job_id = match self.tracker.start(scheduled).await {
            Ok(job_id) => job_id,
            Err(TrackerError::AlreadyRunning { active_job_id }) if scheduled => {
                debug!(active_job_id = %active_job_id, "Scheduled sync skipped, another job is active");
                return Ok(StartOutcome::Skipped { active_job_id });
            }
            Err(e) => return Err(e.into()),
        };

        let engine = self.engine.clone();
        let feed = self.feed.clone();
        let task_job_id = job_id.clone();
        tokio::spawn(async move {
            if let Err(e) = engine.run(&task_job_id, &feed).await {
                debug!(job_id = %task_job_id, code = e.code(), "Background sync ended with error");
            }
        });

        Ok(StartOutcome::Started(job_id))
    }

    /// Claim a job and await its completion
    pub async fn run_now(&self, scheduled: bool) -> Result<CompletedRun, StartSyncError> {
        let job_id = self.tracker.start(scheduled).await?;
        let result = self.engine.run(&job_id, &self.feed).await;
        Ok(CompletedRun { job_id, result })
    }

    pub async fn get_progress(&self, job_id: &str) -> Result<SyncJob, TrackerError> {
        self.tracker.snapshot(job_id).await
    }

    pub async fn get_active(&self) -> Result<Option<(JobId, SyncJob)>, TrackerError> {
        self.tracker.active().await
    }

    /// Run history, oldest first
    pub async fn logs(&self) -> Result<Vec<LogEntry>, StoreError> {
        self.log.all().await
    }

    pub async fn clear_logs(&self) -> Result<(), StoreError> {
        self.log.clear().await?;
        info!("Sync log cleared");
        Ok(())
    }
}
