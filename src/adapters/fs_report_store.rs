//! Flat-directory report store.
//!
//! One gzip file per day, named by [`file_name_for`]. Writes go to a
//! temporary file in the same directory and are renamed into place, so a
//! file with a report name is always complete.

use crate::domain::error::SalesError;
use crate::domain::report_identity::{file_name_for, parse_file_name};
use crate::ports::report_store_port::ReportStorePort;
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub struct FsReportStore {
    base_path: PathBuf,
}

impl FsReportStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Open `base_path`, creating the directory if needed.
    pub fn open(base_path: PathBuf) -> Result<Self, SalesError> {
        fs::create_dir_all(&base_path).map_err(|e| SalesError::Store {
            path: base_path.display().to_string(),
            reason: format!("failed to create directory: {e}"),
        })?;
        Ok(Self::new(base_path))
    }

    pub fn report_path(&self, report_date: NaiveDate) -> PathBuf {
        self.base_path.join(file_name_for(report_date))
    }

    fn store_error(&self, report_date: NaiveDate, what: &str, e: impl std::fmt::Display) -> SalesError {
        SalesError::Store {
            path: self.describe(report_date),
            reason: format!("{what}: {e}"),
        }
    }
}

impl ReportStorePort for FsReportStore {
    fn contains(&self, report_date: NaiveDate) -> bool {
        self.report_path(report_date).is_file()
    }

    fn write(&self, report_date: NaiveDate, bytes: &[u8]) -> Result<(), SalesError> {
        let mut tmp = tempfile::Builder::new()
            .prefix(".partial-")
            .tempfile_in(&self.base_path)
            .map_err(|e| self.store_error(report_date, "failed to create temporary file", e))?;

        tmp.write_all(bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| self.store_error(report_date, "failed to write report", e))?;

        tmp.persist(self.report_path(report_date))
            .map_err(|e| self.store_error(report_date, "failed to move report into place", e.error))?;
        Ok(())
    }

    fn read(&self, report_date: NaiveDate) -> Result<Vec<u8>, SalesError> {
        fs::read(self.report_path(report_date))
            .map_err(|e| self.store_error(report_date, "failed to read report", e))
    }

    fn list(&self) -> Result<Vec<NaiveDate>, SalesError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SalesError::Store {
            path: self.base_path.display().to_string(),
            reason: format!("failed to read directory: {e}"),
        })?;

        let mut dates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SalesError::Store {
                path: self.base_path.display().to_string(),
                reason: format!("directory entry error: {e}"),
            })?;

            let name = entry.file_name();
            if let Some(date) = parse_file_name(&name.to_string_lossy()) {
                if entry.path().is_file() {
                    dates.push(date);
                }
            }
        }

        dates.sort();
        Ok(dates)
    }

    fn describe(&self, report_date: NaiveDate) -> String {
        self.report_path(report_date).display().to_string()
    }
}
