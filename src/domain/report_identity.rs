//! Report file identity and its file-name mapping.
//!
//! The file name is the de-duplication key for the report store: one file per
//! day, and its presence means that day was retrieved successfully.

use chrono::NaiveDate;

pub const REPORT_TYPE: &str = "SALES";
pub const REPORT_SUBTYPE: &str = "SUMMARY";
pub const REPORT_FREQUENCY: &str = "DAILY";

const FILE_PREFIX: &str = "SalesReport-SALES-SUMMARY-DAILY-";
const FILE_SUFFIX: &str = ".txt.gz";
const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// (vendor, SALES, SUMMARY, DAILY, report date).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportFileIdentity {
    pub vendor_number: String,
    pub report_date: NaiveDate,
}

impl ReportFileIdentity {
    pub fn new(vendor_number: impl Into<String>, report_date: NaiveDate) -> Self {
        Self {
            vendor_number: vendor_number.into(),
            report_date,
        }
    }

    /// `yyyy-MM-dd`, as sent to the remote service.
    pub fn report_date_param(&self) -> String {
        self.report_date.format(REPORT_DATE_FORMAT).to_string()
    }

    pub fn file_name(&self) -> String {
        file_name_for(self.report_date)
    }
}

pub fn file_name_for(report_date: NaiveDate) -> String {
    format!(
        "{FILE_PREFIX}{}{FILE_SUFFIX}",
        report_date.format(REPORT_DATE_FORMAT)
    )
}

/// Recover the report date from a persisted file name.
///
/// Anything that does not match the naming pattern exactly yields `None`.
pub fn parse_file_name(name: &str) -> Option<NaiveDate> {
    let date = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    if date.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(date, REPORT_DATE_FORMAT).ok()
}
