//! Persisted report store port trait.

use crate::domain::error::SalesError;
use chrono::NaiveDate;

/// Flat, file-name-keyed storage of daily report files.
///
/// A report is either fully present or absent; a visible entry is proof the
/// day was retrieved successfully.
pub trait ReportStorePort: Send + Sync {
    fn contains(&self, report_date: NaiveDate) -> bool;

    /// Persist `bytes` for `report_date`, all or nothing.
    fn write(&self, report_date: NaiveDate, bytes: &[u8]) -> Result<(), SalesError>;

    fn read(&self, report_date: NaiveDate) -> Result<Vec<u8>, SalesError>;

    /// Dates of every stored report, oldest first.
    fn list(&self) -> Result<Vec<NaiveDate>, SalesError>;

    /// Human-readable location of a report, for logs and errors.
    fn describe(&self, report_date: NaiveDate) -> String;
}
