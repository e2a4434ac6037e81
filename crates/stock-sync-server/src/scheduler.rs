//! Periodic sync trigger
//!
//! Waits an initial delay after startup, then fires on a fixed period. Each
//! tick asks the [`SyncTrigger`] for a scheduled run; a tick that lands while
//! another job is active is skipped by the trigger, not queued.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{info, warn};

use crate::service::{StartOutcome, StartSyncError, SyncService};

/// Default delay before the first scheduled run
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(5 * 60);

/// Supported recurrences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncSchedule {
    #[default]
    Hourly,
    #[serde(rename = "twicedaily")]
    TwiceDaily,
    Daily,
    #[serde(rename = "every_10_minutes")]
    EveryTenMinutes,
}

impl SyncSchedule {
    pub fn period(self) -> Duration {
        match self {
            SyncSchedule::Hourly => Duration::from_secs(60 * 60),
            SyncSchedule::TwiceDaily => Duration::from_secs(12 * 60 * 60),
            SyncSchedule::Daily => Duration::from_secs(24 * 60 * 60),
            SyncSchedule::EveryTenMinutes => Duration::from_secs(10 * 60),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SyncSchedule::Hourly => "hourly",
            SyncSchedule::TwiceDaily => "twicedaily",
            SyncSchedule::Daily => "daily",
            SyncSchedule::EveryTenMinutes => "every_10_minutes",
        }
    }
}

impl std::fmt::Display for SyncSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SyncSchedule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hourly" => Ok(SyncSchedule::Hourly),
            "twicedaily" | "twice_daily" => Ok(SyncSchedule::TwiceDaily),
            "daily" => Ok(SyncSchedule::Daily),
            "every_10_minutes" => Ok(SyncSchedule::EveryTenMinutes),
            other => Err(format!(
                "Invalid sync schedule '{}'; expected hourly, twicedaily, daily or every_10_minutes",
                other
            )),
        }
    }
}

/// Whatever the scheduler fires on each tick
#[async_trait]
pub trait SyncTrigger: Send + Sync {
    async fn trigger_scheduled(&self) -> Result<StartOutcome, StartSyncError>;
}

#[async_trait]
impl SyncTrigger for SyncService {
    async fn trigger_scheduled(&self) -> Result<StartOutcome, StartSyncError> {
        self.start_sync(true).await
    }
}

pub struct SyncScheduler {
    trigger: Arc<dyn SyncTrigger>,
    schedule: SyncSchedule,
    initial_delay: Duration,
}

impl SyncScheduler {
    pub fn new(trigger: Arc<dyn SyncTrigger>, schedule: SyncSchedule) -> Self {
        Self {
            trigger,
            schedule,
            initial_delay: DEFAULT_INITIAL_DELAY,
        }
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Start ticking in the background
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                schedule = %self.schedule,
                initial_delay_secs = self.initial_delay.as_secs(),
                "Sync scheduler started"
            );

            sleep(self.initial_delay).await;

            let mut ticker = interval(self.schedule.period());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match self.trigger.trigger_scheduled().await {
                    Ok(StartOutcome::Started(job_id)) => {
                        info!(job_id = %job_id, "Scheduled sync started");
                    }
                    Ok(StartOutcome::Skipped { active_job_id }) => {
                        info!(active_job_id = %active_job_id, "Scheduled sync skipped, previous run still active");
                    }
                    Err(e) => {
                        warn!(error = %e, "Scheduled sync could not be started");
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingTrigger {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SyncTrigger for CountingTrigger {
        async fn trigger_scheduled(&self) -> Result<StartOutcome, StartSyncError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(StartOutcome::Started(format!("sync_{}", n)))
        }
    }

    #[test]
    fn test_schedule_parsing_and_periods() {
        assert_eq!("hourly".parse::<SyncSchedule>().unwrap(), SyncSchedule::Hourly);
        assert_eq!("TwiceDaily".parse::<SyncSchedule>().unwrap(), SyncSchedule::TwiceDaily);
        assert_eq!("every_10_minutes".parse::<SyncSchedule>().unwrap().period(), Duration::from_secs(600));
        assert_eq!(SyncSchedule::Daily.period(), Duration::from_secs(86_400));
        assert_eq!(SyncSchedule::TwiceDaily.to_string(), "twicedaily");
        assert!("weekly".parse::<SyncSchedule>().is_err());
    }

    #[test]
    fn test_schedule_serde_names() {
        let json = serde_json::to_string(&SyncSchedule::EveryTenMinutes).unwrap();
        assert_eq!(json, "\"every_10_minutes\"");
        let parsed: SyncSchedule = serde_json::from_str("\"twicedaily\"").unwrap();
        assert_eq!(parsed, SyncSchedule::TwiceDaily);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_run_after_initial_delay_then_every_period() {
        let trigger = Arc::new(CountingTrigger::default());
        let handle = SyncScheduler::new(trigger.clone(), SyncSchedule::Hourly).start();

        sleep(Duration::from_secs(299)).await;
        assert_eq!(trigger.calls.load(Ordering::SeqCst), 0);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(trigger.calls.load(Ordering::SeqCst), 1);

        sleep(Duration::from_secs(60 * 60)).await;
        assert_eq!(trigger.calls.load(Ordering::SeqCst), 2);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_initial_delay() {
        let trigger = Arc::new(CountingTrigger::default());
        let handle = SyncScheduler::new(trigger.clone(), SyncSchedule::EveryTenMinutes)
            .with_initial_delay(Duration::ZERO)
            .start();

        sleep(Duration::from_secs(1)).await;
        assert_eq!(trigger.calls.load(Ordering::SeqCst), 1);

        sleep(Duration::from_secs(20 * 60)).await;
        assert_eq!(trigger.calls.load(Ordering::SeqCst), 3);

        handle.abort();
    }
}
