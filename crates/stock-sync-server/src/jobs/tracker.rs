//! Job identity, single-flight claim and progress snapshots
//!
//! Each job owns one snapshot under `sync_progress:<id>`. The store-wide
//! pointer `sync_active_job` names the job currently holding the single-flight
//! claim. A pointer whose snapshot expired or already reached a terminal status
//! is stale and gets replaced or cleared.

use std::sync::Arc;
use std::time::Duration;
use stock_sync_common::{JobId, SyncJob, SyncJobUpdate};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::store::{self, StateStore, StoreError};

/// Key of the active-job pointer
pub const ACTIVE_JOB_KEY: &str = "sync_active_job";

/// Prefix of per-job snapshot keys
pub const PROGRESS_KEY_PREFIX: &str = "sync_progress:";

/// Snapshot lifetime while a job is live, refreshed on every update
pub const LIVE_SNAPSHOT_TTL: Duration = Duration::from_secs(60 * 60);

/// Grace period for late polls after a job finished
pub const TERMINAL_SNAPSHOT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("A sync is already running: {active_job_id}")]
    AlreadyRunning { active_job_id: JobId },

    #[error("Progress not found for job {0}")]
    NotFound(JobId),

    #[error("Job {0} already finished")]
    JobFinished(JobId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Tracks sync jobs in a [`StateStore`]; clones share the same claim lock
#[derive(Clone)]
pub struct SyncJobTracker {
    store: Arc<dyn StateStore>,
    claim: Arc<Mutex<()>>,
}

fn progress_key(job_id: &str) -> String {
    format!("{}{}", PROGRESS_KEY_PREFIX, job_id)
}

impl SyncJobTracker {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            claim: Arc::new(Mutex::new(())),
        }
    }

    fn new_job_id() -> JobId {
        format!("sync_{}", Uuid::new_v4().simple())
    }

    /// Claim the single-flight slot and create a job in `init` state
    #[tracing::instrument(skip(self))]
    pub async fn start(&self, is_scheduled: bool) -> Result<JobId, TrackerError> {
        let _claim = self.claim.lock().await;

        if let Some(active_job_id) = self.pointer().await? {
            match self.load(&active_job_id).await? {
                Some(job) if !job.is_terminal() => {
                    return Err(TrackerError::AlreadyRunning { active_job_id });
                }
                _ => {
                    tracing::debug!(stale_job_id = %active_job_id, "Replacing stale active job pointer");
                }
            }
        }

        let job_id = Self::new_job_id();
        let mut job = SyncJob::new(job_id.clone(), is_scheduled);
        job.message = "Starting sync...".to_string();
        store::save(
            self.store.as_ref(),
            &progress_key(&job_id),
            &job,
            Some(LIVE_SNAPSHOT_TTL),
        )
        .await?;
        store::save(self.store.as_ref(), ACTIVE_JOB_KEY, &job_id, None).await?;

        tracing::info!(job_id = %job_id, is_scheduled, "Sync job claimed");
        Ok(job_id)
    }

    /// Last stored snapshot of a job
    pub async fn snapshot(&self, job_id: &str) -> Result<SyncJob, TrackerError> {
        self.load(job_id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(job_id.to_string()))
    }

    /// Overlay `update` onto the stored snapshot and return the result.
    ///
    /// Terminal snapshots are immutable. The update that makes a job terminal
    /// shortens its lifetime to the grace period and releases the pointer.
    pub async fn update(
        &self,
        job_id: &str,
        update: SyncJobUpdate,
    ) -> Result<SyncJob, TrackerError> {
        let _claim = self.claim.lock().await;

        let mut job = self
            .load(job_id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(job_id.to_string()))?;
        if job.is_terminal() {
            return Err(TrackerError::JobFinished(job_id.to_string()));
        }

        job.apply(update);
        let ttl = if job.is_terminal() {
            TERMINAL_SNAPSHOT_TTL
        } else {
            LIVE_SNAPSHOT_TTL
        };
        store::save(self.store.as_ref(), &progress_key(job_id), &job, Some(ttl)).await?;

        if job.is_terminal() && self.pointer().await?.as_deref() == Some(job_id) {
            self.store.delete(ACTIVE_JOB_KEY).await?;
            tracing::debug!(job_id = %job_id, status = %job.status, "Released active job pointer");
        }

        Ok(job)
    }

    /// The job currently holding the claim, if it is still live
    pub async fn active(&self) -> Result<Option<(JobId, SyncJob)>, TrackerError> {
        let _claim = self.claim.lock().await;

        let Some(job_id) = self.pointer().await? else {
            return Ok(None);
        };

        match self.load(&job_id).await? {
            Some(job) if !job.is_terminal() => Ok(Some((job_id, job))),
            _ => {
                self.store.delete(ACTIVE_JOB_KEY).await?;
                Ok(None)
            }
        }
    }

    async fn pointer(&self) -> Result<Option<JobId>, StoreError> {
        store::load(self.store.as_ref(), ACTIVE_JOB_KEY).await
    }

    async fn load(&self, job_id: &str) -> Result<Option<SyncJob>, StoreError> {
        store::load(self.store.as_ref(), &progress_key(job_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::store::MemoryStateStore;
    use stock_sync_common::{JobStatus, JobStep};

    fn tracker() -> SyncJobTracker {
        SyncJobTracker::new(Arc::new(MemoryStateStore::new()))
    }

    #[tokio::test]
    async fn test_start_creates_init_snapshot() {
        let tracker = tracker();
        let job_id = tracker.start(true).await.unwrap();

        assert!(job_id.starts_with("sync_"));
        let job = tracker.snapshot(&job_id).await.unwrap();
        assert_eq!(job.id, job_id);
        assert_eq!(job.status, JobStatus::Init);
        assert_eq!(job.percent, 0);
        assert_eq!(job.message, "Starting sync...");
        assert!(job.is_scheduled);
    }

    #[tokio::test]
    async fn test_second_start_conflicts_while_running() {
        let tracker = tracker();
        let first = tracker.start(false).await.unwrap();
        tracker
            .update(&first, SyncJobUpdate::step(JobStep::Fetch, 0, "Fetching CSV data..."))
            .await
            .unwrap();

        match tracker.start(false).await {
            Err(TrackerError::AlreadyRunning { active_job_id }) => assert_eq!(active_job_id, first),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrent_starts_claim_once() {
        let tracker = tracker();
        let attempts = (0..8).map(|_| {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.start(false).await })
        });

        let results = futures::future::join_all(attempts).await;
        let started = results
            .into_iter()
            .filter(|r| matches!(r, Ok(Ok(_))))
            .count();
        assert_eq!(started, 1);
    }

    #[tokio::test]
    async fn test_terminal_update_releases_pointer() {
        let tracker = tracker();
        let job_id = tracker.start(false).await.unwrap();
        assert!(tracker.active().await.unwrap().is_some());

        tracker
            .update(&job_id, SyncJobUpdate::failed("CSV file is empty."))
            .await
            .unwrap();

        assert!(tracker.active().await.unwrap().is_none());
        let next = tracker.start(false).await.unwrap();
        assert_ne!(next, job_id);
    }

    #[tokio::test]
    async fn test_terminal_snapshot_is_immutable() {
        let tracker = tracker();
        let job_id = tracker.start(false).await.unwrap();
        tracker
            .update(&job_id, SyncJobUpdate::failed("boom"))
            .await
            .unwrap();

        let result = tracker
            .update(&job_id, SyncJobUpdate::step(JobStep::Sync, 50, "late"))
            .await;
        assert!(matches!(result, Err(TrackerError::JobFinished(_))));
        assert_eq!(tracker.snapshot(&job_id).await.unwrap().message, "boom");
    }

    #[tokio::test]
    async fn test_update_unknown_job() {
        let tracker = tracker();
        let result = tracker.update("sync_missing", SyncJobUpdate::failed("x")).await;
        assert!(matches!(result, Err(TrackerError::NotFound(_))));
        assert!(matches!(
            tracker.snapshot("sync_missing").await,
            Err(TrackerError::NotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_snapshot_expires_after_grace() {
        let tracker = tracker();
        let job_id = tracker.start(false).await.unwrap();
        tracker
            .update(
                &job_id,
                SyncJobUpdate {
                    status: Some(JobStatus::Complete),
                    step: Some(JobStep::Complete),
                    percent: Some(100),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        tokio::time::advance(TERMINAL_SNAPSHOT_TTL - Duration::from_secs(1)).await;
        assert!(tracker.snapshot(&job_id).await.is_ok());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(matches!(
            tracker.snapshot(&job_id).await,
            Err(TrackerError::NotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_live_snapshot_makes_pointer_stale() {
        let tracker = tracker();
        let abandoned = tracker.start(false).await.unwrap();

        tokio::time::advance(LIVE_SNAPSHOT_TTL).await;

        assert!(tracker.active().await.unwrap().is_none());
        let next = tracker.start(false).await.unwrap();
        assert_ne!(next, abandoned);
    }
}
