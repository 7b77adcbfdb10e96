//! One parsed row of a sales report.
//!
//! The column set comes from the file's header line and is open-ended, so a
//! record is a map from header name to raw value. Typed accessors exist only
//! for the columns the aggregation reads.

use chrono::NaiveDate;
use std::collections::HashMap;

pub const BEGIN_DATE: &str = "Begin Date";
pub const UNITS: &str = "Units";
pub const SKU: &str = "SKU";

const BEGIN_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesRecord {
    fields: HashMap<String, String>,
}

impl SalesRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn remove(&mut self, column: &str) -> Option<String> {
        self.fields.remove(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `Begin Date` as a calendar date, or `None` when absent or malformed.
    pub fn begin_date(&self) -> Option<NaiveDate> {
        self.get(BEGIN_DATE)
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), BEGIN_DATE_FORMAT).ok())
    }

    /// `Units` as an integer; absent or non-numeric values count as zero.
    pub fn units(&self) -> i64 {
        self.get(UNITS)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .unwrap_or(0)
    }
}

impl<K, V> FromIterator<(K, V)> for SalesRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
