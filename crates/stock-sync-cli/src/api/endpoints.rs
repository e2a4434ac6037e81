//! API endpoint URL builders
//!
//! Helper functions to construct API endpoint URLs.

fn base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// Build start-sync URL
pub fn sync_jobs_url(base_url: &str) -> String {
    format!("{}/api/v1/sync/jobs", base(base_url))
}

/// Build progress URL for one job
pub fn sync_job_url(base_url: &str, job_id: &str) -> String {
    format!("{}/api/v1/sync/jobs/{}", base(base_url), job_id)
}

/// Build active job URL
pub fn active_url(base_url: &str) -> String {
    format!("{}/api/v1/sync/active", base(base_url))
}

/// Build run history URL
pub fn logs_url(base_url: &str) -> String {
    format!("{}/api/v1/sync/logs", base(base_url))
}

/// Build health check URL
pub fn health_url(base_url: &str) -> String {
    format!("{}/health", base(base_url))
}
