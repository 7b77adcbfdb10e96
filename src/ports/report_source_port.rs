//! Remote report retrieval port trait.

use crate::domain::error::SalesError;
use crate::domain::report_identity::ReportFileIdentity;

/// One call per report identity; returns the raw (gzip-compressed) body.
///
/// Transport, authentication and non-success responses all surface as
/// [`SalesError::Fetch`].
#[async_trait::async_trait]
pub trait ReportSourcePort: Send + Sync {
    async fn fetch_report(&self, identity: &ReportFileIdentity) -> Result<Vec<u8>, SalesError>;
}
