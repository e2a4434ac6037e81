//! Reconciliation of a feed against the catalog
//!
//! Progress weighting: fetch ends at 10%, parse at 20%, mapping at 30%; the
//! apply loop spreads the remaining 70% linearly over the rows processed and
//! reports after every batch.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use stock_sync_common::{
    JobStatus, JobStep, LogEntry, Result, StockStatus, SyncJobUpdate,
};
use tracing::{debug, info, warn};

use super::{
    fetcher::{self, FETCH_TIMEOUT},
    index::ProductIndex,
    parser::{self, FeedRow},
    FeedConfiguration,
};
use crate::catalog::Catalog;
use crate::jobs::{SyncJobTracker, SyncLog};

/// Rows applied between two progress snapshots
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Per-row messages kept for the run history
pub const MAX_ROW_ERRORS: usize = 20;

const FETCH_DONE_PERCENT: u8 = 10;
const PARSE_DONE_PERCENT: u8 = 20;
const MAPPING_DONE_PERCENT: u8 = 30;
const APPLY_SPAN_PERCENT: u128 = 70;

/// Tunables of one engine instance
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub batch_size: usize,
    pub fetch_timeout: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            fetch_timeout: FETCH_TIMEOUT,
        }
    }
}

/// Counters of a completed run; `updated + skipped == total`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub updated: u64,
    pub skipped: u64,
    pub total: u64,
    /// First few per-row problems, capped at [`MAX_ROW_ERRORS`]
    pub errors: Vec<String>,
}

impl SyncResult {
    pub fn processed(&self) -> u64 {
        self.updated + self.skipped
    }

    pub fn message(&self) -> String {
        format!(
            "Stock sync completed. Updated: {}, Skipped: {}",
            self.updated, self.skipped
        )
    }

    fn skip(&mut self, reason: String) {
        self.skipped += 1;
        if self.errors.len() < MAX_ROW_ERRORS {
            self.errors.push(reason);
        }
    }
}

/// Runs `fetch -> parse -> index -> apply` for a claimed job
pub struct ReconciliationEngine {
    catalog: Arc<dyn Catalog>,
    tracker: SyncJobTracker,
    log: SyncLog,
    options: EngineOptions,
}

impl ReconciliationEngine {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        tracker: SyncJobTracker,
        log: SyncLog,
        options: EngineOptions,
    ) -> Self {
        Self {
            catalog,
            tracker,
            log,
            options,
        }
    }

    /// Run the job to a terminal snapshot.
    ///
    /// Success appends to the run history before the `complete` snapshot
    /// releases the claim; failure only records the `error` snapshot.
    #[tracing::instrument(skip(self, feed), fields(job_id = %job_id, url = %feed.url))]
    pub async fn run(&self, job_id: &str, feed: &FeedConfiguration) -> Result<SyncResult> {
        match self.execute(job_id, feed).await {
            Ok(result) => {
                self.finish(job_id, &result).await;
                Ok(result)
            }
            Err(err) => {
                warn!(code = err.code(), error = %err, "Stock sync failed");
                self.report(job_id, SyncJobUpdate::failed(err.to_string()))
                    .await;
                Err(err)
            }
        }
    }

    async fn execute(&self, job_id: &str, feed: &FeedConfiguration) -> Result<SyncResult> {
        feed.validate()?;

        self.report(
            job_id,
            SyncJobUpdate::step(JobStep::Fetch, 0, "Fetching CSV data..."),
        )
        .await;
        let raw = fetcher::fetch(&feed.url, self.options.fetch_timeout, feed.verify_tls).await?;

        self.report(
            job_id,
            SyncJobUpdate::step(JobStep::Parse, FETCH_DONE_PERCENT, "Parsing CSV data..."),
        )
        .await;
        let rows = parser::parse(&raw, &feed.sku_column, &feed.stock_column)?;
        drop(raw);
        let total = rows.len() as u64;

        self.report(
            job_id,
            SyncJobUpdate::step(JobStep::Mapping, PARSE_DONE_PERCENT, "Loading product database...")
                .with_total(total),
        )
        .await;
        let index = ProductIndex::build(self.catalog.as_ref()).await?;

        let mut result = SyncResult {
            total,
            ..Default::default()
        };
        self.report(job_id, sync_progress(&result, MAPPING_DONE_PERCENT))
            .await;

        for batch in rows.chunks(self.options.batch_size.max(1)) {
            for row in batch {
                self.apply_row(&index, row, &mut result).await;
            }
            self.catalog.drop_cache().await;

            let percent = progress_percent(result.processed(), total);
            debug!(
                processed = result.processed(),
                total,
                percent,
                "Applied batch"
            );
            self.report(job_id, sync_progress(&result, percent)).await;
        }

        Ok(result)
    }

    async fn apply_row(&self, index: &ProductIndex, row: &FeedRow, result: &mut SyncResult) {
        let Some(product_id) = index.lookup(&row.sku) else {
            result.skip(format!("Product with SKU \"{}\" not found.", row.sku));
            return;
        };

        let mut product = match self.catalog.get(product_id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                result.skip(format!("Could not load product with SKU \"{}\".", row.sku));
                return;
            }
            Err(e) => {
                warn!(sku = %row.sku, product_id, error = %e, "Failed to load product");
                result.skip(format!("Could not load product with SKU \"{}\".", row.sku));
                return;
            }
        };

        let quantity = coerce_quantity(&row.quantity);
        product.set_stock(quantity, StockStatus::from_quantity(quantity));

        match self.catalog.save(&product).await {
            Ok(()) => result.updated += 1,
            Err(e) => {
                warn!(sku = %row.sku, product_id, error = %e, "Failed to save product");
                result.skip(format!("Could not save product with SKU \"{}\": {}", row.sku, e));
            }
        }
    }

    async fn finish(&self, job_id: &str, result: &SyncResult) {
        let message = result.message();

        let entry = LogEntry {
            timestamp: chrono::Utc::now(),
            success: true,
            message: message.clone(),
            updated: result.updated,
            skipped: result.skipped,
            errors: result.errors.clone(),
        };
        if let Err(e) = self.log.append(entry).await {
            warn!(job_id = %job_id, error = %e, "Failed to append sync log entry");
        }

        let update = SyncJobUpdate {
            status: Some(JobStatus::Complete),
            step: Some(JobStep::Complete),
            percent: Some(100),
            message: Some(message),
            ..Default::default()
        }
        .with_counts(result.updated, result.skipped, result.total, result.processed());
        self.report(job_id, update).await;

        info!(
            job_id = %job_id,
            updated = result.updated,
            skipped = result.skipped,
            total = result.total,
            "Stock sync completed"
        );
    }

    /// Progress writes never abort a run
    async fn report(&self, job_id: &str, update: SyncJobUpdate) {
        if let Err(e) = self.tracker.update(job_id, update).await {
            warn!(job_id = %job_id, error = %e, "Failed to record sync progress");
        }
    }
}

fn sync_progress(result: &SyncResult, percent: u8) -> SyncJobUpdate {
    SyncJobUpdate::step(
        JobStep::Sync,
        percent,
        format!(
            "Syncing products... {} updated, {} skipped",
            result.updated, result.skipped
        ),
    )
    .with_counts(result.updated, result.skipped, result.total, result.processed())
}

/// `30 + round(70 * processed / total)`, half rounded up
pub fn progress_percent(processed: u64, total: u64) -> u8 {
    if total == 0 {
        return MAPPING_DONE_PERCENT;
    }
    let processed = u128::from(processed.min(total));
    let total = u128::from(total);
    let span = (2 * APPLY_SPAN_PERCENT * processed + total) / (2 * total);
    MAPPING_DONE_PERCENT + span as u8
}

/// Leading-number reading of a stock field.
///
/// The longest numeric prefix counts: optional sign, digits, an optional
/// fraction and an optional exponent (`"1e3"` is 1000, `"3.7"` is 3). A field
/// without a numeric prefix is 0. Fractions truncate toward zero and
/// out-of-range values saturate.
pub fn coerce_quantity(raw: &str) -> i64 {
    let raw = raw.trim();
    let bytes = raw.as_bytes();

    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let sign_len = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(sign_len);
    let mut end = int_end;
    let mut is_integer = true;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 || int_end > sign_len {
            end = frac_end;
            is_integer = false;
        }
    }
    if end == sign_len {
        return 0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + exp_sign);
        if exp_end > end + 1 + exp_sign {
            end = exp_end;
            is_integer = false;
        }
    }

    if is_integer {
        return leading_integer(&raw[..end]);
    }
    // `as` saturates at the i64 bounds
    raw[..end].parse::<f64>().map(|value| value.trunc() as i64).unwrap_or(0)
}

fn leading_integer(number: &str) -> i64 {
    let (negative, digits) = match number.as_bytes().first() {
        Some(b'-') => (true, &number[1..]),
        Some(b'+') => (false, &number[1..]),
        _ => (false, number),
    };

    digits.bytes().fold(0_i64, |value, b| {
        let digit = i64::from(b - b'0');
        if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        }
    })
}
