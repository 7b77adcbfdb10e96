#![allow(dead_code)]

use chrono::NaiveDate;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use storefront_sales::adapters::fs_report_store::FsReportStore;
use storefront_sales::domain::cancel::CancelHandle;
use storefront_sales::domain::error::SalesError;
use storefront_sales::domain::report_identity::ReportFileIdentity;
use storefront_sales::ports::report_source_port::ReportSourcePort;
use storefront_sales::ports::report_store_port::ReportStorePort;

pub const HEADER: &str = "Provider\tSKU\tUnits\tBegin Date\tEnd Date\tTitle";
pub const TARGET_SKU: &str = "com.example.App";

/// Report source serving scripted payloads and counting every call.
pub struct MockReportSource {
    pub payloads: HashMap<NaiveDate, Vec<u8>>,
    pub failing: HashSet<NaiveDate>,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
    pub requested: Mutex<Vec<NaiveDate>>,
}

impl MockReportSource {
    pub fn new() -> Self {
        Self {
            payloads: HashMap::new(),
            failing: HashSet::new(),
            delay: None,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with_payload(mut self, date: NaiveDate, bytes: Vec<u8>) -> Self {
        self.payloads.insert(date, bytes);
        self
    }

    pub fn with_failure(mut self, date: NaiveDate) -> Self {
        self.failing.insert(date);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested_dates(&self) -> Vec<NaiveDate> {
        let mut dates = self.requested.lock().unwrap().clone();
        dates.sort();
        dates
    }
}

#[async_trait::async_trait]
impl ReportSourcePort for MockReportSource {
    async fn fetch_report(&self, identity: &ReportFileIdentity) -> Result<Vec<u8>, SalesError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(identity.report_date);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(&identity.report_date) {
            return Err(SalesError::Fetch {
                date: identity.report_date,
                reason: "request failed with status 500 Internal Server Error".into(),
            });
        }

        Ok(self
            .payloads
            .get(&identity.report_date)
            .cloned()
            .unwrap_or_else(|| sales_report(&[(TARGET_SKU, identity.report_date, "1")])))
    }
}

/// Source that raises the cancellation signal while its call is in flight,
/// then still returns a full payload.
pub struct CancellingSource {
    pub handle: CancelHandle,
    pub calls: AtomicUsize,
}

impl CancellingSource {
    pub fn new(handle: CancelHandle) -> Self {
        Self {
            handle,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl ReportSourcePort for CancellingSource {
    async fn fetch_report(&self, identity: &ReportFileIdentity) -> Result<Vec<u8>, SalesError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.handle.cancel();
        Ok(sales_report(&[(TARGET_SKU, identity.report_date, "1")]))
    }
}

/// File store whose writes block the calling thread before landing.
pub struct SlowStore {
    pub inner: FsReportStore,
    pub write_delay: Duration,
}

impl ReportStorePort for SlowStore {
    fn contains(&self, report_date: NaiveDate) -> bool {
        self.inner.contains(report_date)
    }

    fn write(&self, report_date: NaiveDate, bytes: &[u8]) -> Result<(), SalesError> {
        std::thread::sleep(self.write_delay);
        self.inner.write(report_date, bytes)
    }

    fn read(&self, report_date: NaiveDate) -> Result<Vec<u8>, SalesError> {
        self.inner.read(report_date)
    }

    fn list(&self) -> Result<Vec<NaiveDate>, SalesError> {
        self.inner.list()
    }

    fn describe(&self, report_date: NaiveDate) -> String {
        self.inner.describe(report_date)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn gzip(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

/// Gzipped report with one row per `(sku, begin date, units)`.
pub fn sales_report(rows: &[(&str, NaiveDate, &str)]) -> Vec<u8> {
    let mut text = String::from(HEADER);
    text.push('\n');
    for (sku, day, units) in rows {
        text.push_str(&format!(
            "APPLE\t{}\t{}\t{}\t{}\tExample\n",
            sku,
            units,
            day.format("%m/%d/%Y"),
            day.format("%m/%d/%Y")
        ));
    }
    gzip(&text)
}
