//! Port traits implemented by adapters.

pub mod config_port;
pub mod report_source_port;
pub mod report_store_port;
