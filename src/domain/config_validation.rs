//! Configuration validation.
//!
//! Checks every configured value before any work runs. Keys that can also be
//! supplied on the command line (vendor number, SKU) are only checked when
//! present; [`require_string`] enforces them after overrides are applied.

use crate::domain::error::SalesError;
use crate::domain::report_fetch::{DEFAULT_MAX_CONCURRENT, MAX_CONCURRENT_LIMIT};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn validate_fetch_config(config: &dyn ConfigPort) -> Result<(), SalesError> {
    validate_not_blank(config, "vendor", "number")?;
    validate_not_blank(config, "store", "dir")?;
    validate_max_concurrent(config)?;
    validate_timeout(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_view_config(config: &dyn ConfigPort) -> Result<(), SalesError> {
    validate_not_blank(config, "product", "sku")?;
    validate_not_blank(config, "store", "dir")?;
    Ok(())
}

/// `override_value` if given, else the configured value; blank counts as missing.
pub fn require_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    override_value: Option<&str>,
) -> Result<String, SalesError> {
    override_value
        .map(str::to_string)
        .or_else(|| config.get_string(section, key))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SalesError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })
}

/// Parse an optional `YYYY-MM-DD` value from `[fetch]`.
pub fn parse_fetch_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, SalesError> {
    match config.get_string("fetch", key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(Some)
            .map_err(|_| SalesError::ConfigInvalid {
                section: "fetch".to_string(),
                key: key.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", key),
            }),
    }
}

fn validate_not_blank(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), SalesError> {
    match config.get_string(section, key) {
        Some(s) if s.trim().is_empty() => Err(SalesError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} must not be empty", key),
        }),
        _ => Ok(()),
    }
}

/// `[fetch] max_concurrent`, between 1 and [`MAX_CONCURRENT_LIMIT`].
pub fn max_concurrent(config: &dyn ConfigPort) -> Result<usize, SalesError> {
    let value = config.get_int("fetch", "max_concurrent", DEFAULT_MAX_CONCURRENT as i64);
    usize::try_from(value)
        .ok()
        .filter(|v| (1..=MAX_CONCURRENT_LIMIT).contains(v))
        .ok_or_else(|| SalesError::ConfigInvalid {
            section: "fetch".to_string(),
            key: "max_concurrent".to_string(),
            reason: format!("max_concurrent must be between 1 and {MAX_CONCURRENT_LIMIT}"),
        })
}

fn validate_max_concurrent(config: &dyn ConfigPort) -> Result<(), SalesError> {
    max_concurrent(config).map(|_| ())
}

fn validate_timeout(config: &dyn ConfigPort) -> Result<(), SalesError> {
    let value = config.get_int("api", "timeout_secs", 1);
    if value < 1 {
        return Err(SalesError::ConfigInvalid {
            section: "api".to_string(),
            key: "timeout_secs".to_string(),
            reason: "timeout_secs must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), SalesError> {
    let start = parse_fetch_date(config, "start_date")?;
    let end = parse_fetch_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(SalesError::ConfigInvalid {
                section: "fetch".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must not be after end_date".to_string(),
            });
        }
    }
    Ok(())
}
