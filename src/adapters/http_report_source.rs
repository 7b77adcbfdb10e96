//! HTTP report source for the storefront sales-reports endpoint.

use crate::domain::error::SalesError;
use crate::domain::report_identity::{
    ReportFileIdentity, REPORT_FREQUENCY, REPORT_SUBTYPE, REPORT_TYPE,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_source_port::ReportSourcePort;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.appstoreconnect.apple.com";
pub const DEFAULT_TIMEOUT_SECS: i64 = 30;
pub const TOKEN_ENV_VAR: &str = "SALES_API_TOKEN";

const REPORTS_PATH: &str = "/v1/salesReports";
const GZIP_MEDIA_TYPE: &str = "application/a-gzip";

pub struct HttpReportSource {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpReportSource {
    pub fn new(base_url: &str, token: String, timeout: Duration) -> Result<Self, SalesError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SalesError::ConfigInvalid {
                section: "api".into(),
                key: "base_url".into(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SalesError> {
        let base_url = config
            .get_string("api", "base_url")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // Token from [api] token, falling back to the environment
        let token = config
            .get_string("api", "token")
            .filter(|s| !s.trim().is_empty())
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok())
            .ok_or_else(|| SalesError::ConfigMissing {
                section: "api".into(),
                key: "token".into(),
            })?;

        let timeout_secs = config.get_int("api", "timeout_secs", DEFAULT_TIMEOUT_SECS).max(1);
        Self::new(&base_url, token, Duration::from_secs(timeout_secs as u64))
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, REPORTS_PATH)
    }
}

/// Query parameters selecting one daily summary sales report.
pub fn report_query(identity: &ReportFileIdentity) -> Vec<(&'static str, String)> {
    vec![
        ("filter[reportType]", REPORT_TYPE.to_string()),
        ("filter[reportSubType]", REPORT_SUBTYPE.to_string()),
        ("filter[frequency]", REPORT_FREQUENCY.to_string()),
        ("filter[vendorNumber]", identity.vendor_number.clone()),
        ("filter[reportDate]", identity.report_date_param()),
    ]
}

#[async_trait::async_trait]
impl ReportSourcePort for HttpReportSource {
    async fn fetch_report(&self, identity: &ReportFileIdentity) -> Result<Vec<u8>, SalesError> {
        let fetch_error = |reason: String| SalesError::Fetch {
            date: identity.report_date,
            reason,
        };

        tracing::debug!(date = %identity.report_date, "requesting sales report");
        let resp = self
            .client
            .get(self.endpoint())
            .query(&report_query(identity))
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, GZIP_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| fetch_error(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(fetch_error(format!("request failed with status {status}")));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| fetch_error(format!("failed to read response body: {e}")))?;
        Ok(body.to_vec())
    }
}
