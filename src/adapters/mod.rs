//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod fs_report_store;
#[cfg(feature = "http")]
pub mod http_report_source;
