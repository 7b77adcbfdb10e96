//! Sales report decoder.
//!
//! Two separate stages: [`decompress`] is the only one that can fail, and
//! text decoding plus [`parse_rows`] never do. A corrupt file is rejected as
//! a whole, while odd lines inside a readable file degrade quietly.

use crate::domain::sales_record::{SalesRecord, SKU};
use flate2::read::GzDecoder;
use std::io::Read;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("corrupt gzip stream: {0}")]
    Gzip(#[source] std::io::Error),
}

/// Decompress one report file and keep only the rows for `sku`.
///
/// A payload that is not UTF-8 text has no readable rows and yields none.
pub fn decode_report(compressed: &[u8], sku: &str) -> Result<Vec<SalesRecord>, DecodeError> {
    let raw = decompress(compressed)?;
    match String::from_utf8(raw) {
        Ok(text) => Ok(parse_rows(&text, sku)),
        Err(e) => {
            tracing::warn!(error = %e, "report payload is not UTF-8, no rows read");
            Ok(Vec::new())
        }
    }
}

pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut raw = Vec::new();
    GzDecoder::new(compressed)
        .read_to_end(&mut raw)
        .map_err(DecodeError::Gzip)?;
    Ok(raw)
}

/// Split tab-separated text into records keyed by the header line.
///
/// Values are zipped with header names by position, so a short line leaves
/// trailing columns unset and a long line drops its extra values. Rows whose
/// `SKU` is not exactly `sku` are discarded, and the `SKU` column itself is
/// not kept on the surviving records.
pub fn parse_rows(text: &str, sku: &str) -> Vec<SalesRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = match reader.headers() {
        Ok(h) => h.clone(),
        Err(e) => {
            tracing::debug!(error = %e, "unreadable header line");
            return Vec::new();
        }
    };

    let mut out = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(line = idx + 2, error = %e, "skipping unreadable line");
                continue;
            }
        };

        let mut record: SalesRecord = headers.iter().zip(row.iter()).collect();
        if record.remove(SKU).as_deref() == Some(sku) {
            out.push(record);
        }
    }
    out
}
