//! SocClient - HTTP client for the SOC `exportadados` web service

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::params::{CompanyQuery, EmployeeQuery, StatusFilter};
use super::rate_limit::RateLimiter;
use crate::config::ExportCredentials;
use crate::error::{SyncError, SyncResult};

/// Company export timeout
pub const COMPANY_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
/// Per-company employee export timeout
pub const EMPLOYEE_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Origin of raw company and employee data
///
/// Implementations return the parsed response body as-is; shape resolution
/// happens in [`super::payload`].
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Company export of the configured tenant (single call)
    async fn fetch_companies(&self) -> SyncResult<Value>;

    /// Employee export of one company
    async fn fetch_employees(&self, company_code: i64, filter: StatusFilter) -> SyncResult<Value>;
}

/// HTTP client for the SOC export API
pub struct SocClient {
    client: Client,
    base_url: String,
    company_export: Option<ExportCredentials>,
    employee_export: Option<ExportCredentials>,
    /// Shared by every employee fetch of the run
    limiter: RateLimiter,
}

impl SocClient {
    pub fn new(base_url: impl Into<String>, max_calls_per_second: u32) -> SyncResult<Self> {
        let client = Client::builder().build()?;
        let limiter = RateLimiter::new(max_calls_per_second);
        tracing::debug!(
            min_interval_ms = limiter.min_interval().as_millis() as u64,
            "Employee fetch rate limit configured"
        );
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            company_export: None,
            employee_export: None,
            limiter,
        })
    }

    pub fn with_company_export(mut self, credentials: ExportCredentials) -> Self {
        self.company_export = Some(credentials);
        self
    }

    pub fn with_employee_export(mut self, credentials: ExportCredentials) -> Self {
        self.employee_export = Some(credentials);
        self
    }

    fn export_url(&self) -> String {
        format!("{}/exportadados", self.base_url)
    }

    /// GET `/exportadados?parametro=<json>` and parse the JSON body
    async fn export<Q: Serialize>(&self, query: &Q, timeout: Duration) -> SyncResult<Value> {
        let parametro = serde_json::to_string(query)
            .map_err(|e| SyncError::Decode(format!("Failed to encode parametro: {e}")))?;

        let response = self
            .client
            .get(self.export_url())
            .query(&[("parametro", parametro.as_str())])
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| SyncError::Decode(format!("Response is not valid JSON: {e}")))
    }
}

#[async_trait]
impl DataSource for SocClient {
    async fn fetch_companies(&self) -> SyncResult<Value> {
        let credentials = self
            .company_export
            .as_ref()
            .ok_or_else(|| SyncError::config("Company export credentials not configured"))?;

        tracing::info!(url = %self.export_url(), "Fetching company data from API");
        self.export(&CompanyQuery::new(credentials), COMPANY_FETCH_TIMEOUT)
            .await
    }

    async fn fetch_employees(&self, company_code: i64, filter: StatusFilter) -> SyncResult<Value> {
        let credentials = self
            .employee_export
            .as_ref()
            .ok_or_else(|| SyncError::config("Employee export credentials not configured"))?;

        self.limiter.wait().await;

        tracing::info!(company = company_code, "Fetching employee data from API");
        self.export(
            &EmployeeQuery::new(credentials, company_code, filter),
            EMPLOYEE_FETCH_TIMEOUT,
        )
        .await
    }
}
