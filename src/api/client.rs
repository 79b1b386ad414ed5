//! Reporting API client
//!
//! Fetches pre-aggregated appointment statistics from the backend.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::ReportConfig;
use crate::models::RawReportStatistics;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid bearer token")]
    InvalidToken,
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Source of raw report payloads
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Weekly report; the backend derives the end date as start + 6 days
    async fn weekly_report(&self, start_date: &str) -> ApiResult<RawReportStatistics>;

    /// Monthly report for `(year, month)`, month 1-based
    async fn monthly_report(&self, year: i32, month: u32) -> ApiResult<RawReportStatistics>;
}

/// `ReportSource` backed by the MediNexus REST API
#[derive(Clone)]
pub struct HttpReportSource {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpReportSource {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.clone(),
            token: config.api_token.clone(),
        }
    }

    fn headers(&self) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::InvalidToken)?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> ApiResult<RawReportStatistics> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Requesting report from {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Report API error ({}): {}", status, body);
            return Err(ApiError::Status { status, body });
        }

        Ok(response.json::<RawReportStatistics>().await?)
    }
}

#[async_trait]
impl ReportSource for HttpReportSource {
    async fn weekly_report(&self, start_date: &str) -> ApiResult<RawReportStatistics> {
        self.get("/reports/weekly", &[("startDate", start_date.to_string())])
            .await
    }

    async fn monthly_report(&self, year: i32, month: u32) -> ApiResult<RawReportStatistics> {
        self.get(
            "/reports/monthly",
            &[("year", year.to_string()), ("month", month.to_string())],
        )
        .await
    }
}
