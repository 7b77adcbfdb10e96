//! Decode every stored report into one flat record collection.

use crate::domain::decoder::decode_report;
use crate::domain::error::SalesError;
use crate::domain::sales_record::SalesRecord;
use crate::ports::report_store_port::ReportStorePort;
use chrono::NaiveDate;
use rayon::prelude::*;

/// Records from all readable files plus the files that could not be decoded.
#[derive(Debug, Default)]
pub struct LoadedRecords {
    pub records: Vec<SalesRecord>,
    pub files_read: usize,
    pub failures: Vec<(NaiveDate, SalesError)>,
}

/// Decode all stored reports for `sku`, files in parallel.
///
/// Records come back in chronological file order regardless of scheduling.
/// A file that fails to read or decompress is reported and skipped.
pub fn load_records(store: &dyn ReportStorePort, sku: &str) -> Result<LoadedRecords, SalesError> {
    let dates = store.list()?;

    let decoded: Vec<(NaiveDate, Result<Vec<SalesRecord>, SalesError>)> = dates
        .par_iter()
        .map(|&date| (date, load_one(store, date, sku)))
        .collect();

    let mut loaded = LoadedRecords::default();
    for (date, result) in decoded {
        match result {
            Ok(records) => {
                loaded.files_read += 1;
                loaded.records.extend(records);
            }
            Err(e) => {
                tracing::warn!(%date, error = %e, "skipping unreadable sales report");
                loaded.failures.push((date, e));
            }
        }
    }

    tracing::info!(
        files = loaded.files_read,
        failed = loaded.failures.len(),
        records = loaded.records.len(),
        sku,
        "loaded sales records"
    );
    Ok(loaded)
}

fn load_one(
    store: &dyn ReportStorePort,
    date: NaiveDate,
    sku: &str,
) -> Result<Vec<SalesRecord>, SalesError> {
    let bytes = store.read(date)?;
    decode_report(&bytes, sku).map_err(|e| SalesError::Decompress {
        path: store.describe(date),
        reason: e.to_string(),
    })
}
