//! Concurrent per-day report retrieval.
//!
//! Every day of the requested interval becomes its own task. Tasks share
//! nothing but the store (each writes a distinct file) and the cancellation
//! token, and the run returns only after all of them have finished. One
//! day's failure is recorded in the summary and never stops its siblings.

use crate::domain::cancel::CancelToken;
use crate::domain::date_interval::DateInterval;
use crate::domain::error::SalesError;
use crate::domain::report_identity::ReportFileIdentity;
use crate::ports::report_source_port::ReportSourcePort;
use crate::ports::report_store_port::ReportStorePort;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub const DEFAULT_MAX_CONCURRENT: usize = 8;
pub const MAX_CONCURRENT_LIMIT: usize = 256;

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub vendor_number: String,
    pub interval: DateInterval,
    pub skip_existing: bool,
    pub max_concurrent: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayStatus {
    Fetched { bytes: usize },
    Skipped,
    Failed { reason: String },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayOutcome {
    pub date: NaiveDate,
    pub status: DayStatus,
}

/// Result of one orchestration run, one outcome per requested day.
#[derive(Debug, Clone, Default)]
pub struct FetchSummary {
    pub outcomes: Vec<DayOutcome>,
}

impl FetchSummary {
    pub fn fetched(&self) -> usize {
        self.count(|s| matches!(s, DayStatus::Fetched { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, DayStatus::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, DayStatus::Failed { .. }))
    }

    pub fn cancelled(&self) -> usize {
        self.count(|s| matches!(s, DayStatus::Cancelled))
    }

    pub fn failures(&self) -> impl Iterator<Item = (NaiveDate, &str)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            DayStatus::Failed { reason } => Some((o.date, reason.as_str())),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&DayStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Ensure a report file exists for every day of `request.interval`.
///
/// Best effort: all days are attempted and the summary says which ones
/// succeeded. Days that fail stay absent and are retried on the next run.
pub async fn fetch_reports(
    source: Arc<dyn ReportSourcePort>,
    store: Arc<dyn ReportStorePort>,
    request: &FetchRequest,
    cancel: CancelToken,
) -> FetchSummary {
    let permits = Arc::new(Semaphore::new(
        request.max_concurrent.clamp(1, MAX_CONCURRENT_LIMIT),
    ));
    let mut tasks = JoinSet::new();

    tracing::info!(
        vendor = %request.vendor_number,
        interval = %request.interval,
        days = request.interval.len_days(),
        "fetching sales reports"
    );

    for date in request.interval.days() {
        let identity = ReportFileIdentity::new(request.vendor_number.clone(), date);
        let source = Arc::clone(&source);
        let store = Arc::clone(&store);
        let permits = Arc::clone(&permits);
        let cancel = cancel.clone();
        let mut cancel_wait = cancel.clone();
        let skip_existing = request.skip_existing;

        tasks.spawn(async move {
            let status = tokio::select! {
                biased;
                _ = cancel_wait.cancelled() => DayStatus::Cancelled,
                status = fetch_day(&*source, store, &identity, skip_existing, &permits, &cancel) => status,
            };
            DayOutcome { date, status }
        });
    }

    let mut outcomes = Vec::with_capacity(request.interval.len_days());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => tracing::error!(error = %e, "fetch task aborted"),
        }
    }
    record_lost_days(&mut outcomes, &request.interval);
    outcomes.sort_by_key(|o| o.date);

    let summary = FetchSummary { outcomes };
    tracing::info!(
        fetched = summary.fetched(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        cancelled = summary.cancelled(),
        "sales report fetch finished"
    );
    summary
}

async fn fetch_day(
    source: &dyn ReportSourcePort,
    store: Arc<dyn ReportStorePort>,
    identity: &ReportFileIdentity,
    skip_existing: bool,
    permits: &Semaphore,
    cancel: &CancelToken,
) -> DayStatus {
    let date = identity.report_date;
    if skip_existing && stored(Arc::clone(&store), date).await {
        tracing::debug!(%date, "report already stored, skipping");
        return DayStatus::Skipped;
    }

    let _permit = match permits.acquire().await {
        Ok(p) => p,
        Err(_) => return DayStatus::Cancelled,
    };

    let result = match source.fetch_report(identity).await {
        Ok(_) if cancel.is_cancelled() => Err(SalesError::Cancelled),
        Ok(bytes) => persist(Arc::clone(&store), date, bytes).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(bytes) => {
            tracing::debug!(%date, bytes, path = %store.describe(date), "report stored");
            DayStatus::Fetched { bytes }
        }
        Err(SalesError::Cancelled) => DayStatus::Cancelled,
        Err(e) => {
            tracing::warn!(%date, error = %e, "failed to retrieve sales report");
            DayStatus::Failed {
                reason: e.to_string(),
            }
        }
    }
}

// Store calls touch the filesystem and run on the blocking pool.

async fn stored(store: Arc<dyn ReportStorePort>, date: NaiveDate) -> bool {
    tokio::task::spawn_blocking(move || store.contains(date))
        .await
        .unwrap_or(false)
}

async fn persist(
    store: Arc<dyn ReportStorePort>,
    date: NaiveDate,
    bytes: Vec<u8>,
) -> Result<usize, SalesError> {
    let len = bytes.len();
    let path = store.describe(date);
    tokio::task::spawn_blocking(move || store.write(date, &bytes))
        .await
        .map_err(|e| SalesError::Store {
            path,
            reason: format!("write task aborted: {e}"),
        })?
        .map(|()| len)
}

/// Days whose task panicked never report back; count them as failed.
fn record_lost_days(outcomes: &mut Vec<DayOutcome>, interval: &DateInterval) {
    if outcomes.len() == interval.len_days() {
        return;
    }
    let seen: std::collections::HashSet<NaiveDate> = outcomes.iter().map(|o| o.date).collect();
    for date in interval.days().filter(|d| !seen.contains(d)) {
        outcomes.push(DayOutcome {
            date,
            status: DayStatus::Failed {
                reason: "fetch task aborted".into(),
            },
        });
    }
}
