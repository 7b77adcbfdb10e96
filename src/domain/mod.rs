//! Core domain types and logic: decoding, aggregation and fetch orchestration.

pub mod aggregator;
pub mod cancel;
pub mod chart_text;
pub mod config_validation;
pub mod date_interval;
pub mod decoder;
pub mod error;
pub mod report_fetch;
pub mod report_identity;
pub mod report_loader;
pub mod sales_record;
