//! Feed download

use std::time::Duration;
use stock_sync_common::{Result, SyncError};

/// Timeout for the feed download
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// GET `url` and return the raw body.
///
/// Only a `200` with a non-empty body is accepted; the content type is
/// ignored since the format is sniffed from the bytes.
#[tracing::instrument(skip(timeout))]
pub async fn fetch(url: &str, timeout: Duration, verify_tls: bool) -> Result<Vec<u8>> {
    let url = url.trim();
    if url.is_empty() {
        return Err(SyncError::config("CSV URL is not configured."));
    }

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(!verify_tls)
        .build()
        .map_err(|e| SyncError::network(format!("Failed to build HTTP client: {}", e)))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_builder() {
            SyncError::config(format!("Invalid CSV URL: {}", url))
        } else if e.is_timeout() {
            SyncError::network(format!("Timed out after {}s fetching {}", timeout.as_secs(), url))
        } else {
            SyncError::network(e.to_string())
        }
    })?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(SyncError::Http {
            code: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| SyncError::network(format!("Failed to read CSV body: {}", e)))?;

    if body.is_empty() {
        return Err(SyncError::EmptyFeed);
    }

    tracing::debug!(bytes = body.len(), "Fetched CSV feed");
    Ok(body.to_vec())
}
