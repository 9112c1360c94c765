use async_trait::async_trait;
use serde::Deserialize;

use crate::core::config::SiskeudesConfig;
use crate::core::error::{AppError, Result};
use crate::features::output_details::models::OutputDetail;
use crate::features::regions::Region;

/// Retrieves the raw (untransformed) output details of one region
#[async_trait]
pub trait OutputDetailFetcher: Send + Sync {
    async fn fetch_output_details(&self, region: &Region) -> Result<Vec<OutputDetail>>;
}

/// The provider answers either with a bare array or with `{"data": [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OutputDetailPayload {
    List(Vec<OutputDetail>),
    Envelope { data: Option<Vec<OutputDetail>> },
}

impl OutputDetailPayload {
    fn into_details(self) -> Vec<OutputDetail> {
        match self {
            OutputDetailPayload::List(details) => details,
            OutputDetailPayload::Envelope { data } => data.unwrap_or_default(),
        }
    }
}

/// HTTP client for the SISKEUDES output detail endpoint
pub struct SiskeudesClient {
    client: reqwest::Client,
    config: SiskeudesConfig,
    /// Sent as `tahun` when set; otherwise the provider picks its current year
    fiscal_year: Option<String>,
}

impl SiskeudesClient {
    pub fn new(config: SiskeudesConfig, fiscal_year: Option<String>) -> Result<Self> {
        reqwest::Url::parse(&config.api_url).map_err(|e| {
            AppError::Config(format!("Invalid SISKEUDES_API_URL '{}': {}", config.api_url, e))
        })?;

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            fiscal_year,
        })
    }

    fn query_params<'a>(&'a self, region: &'a Region) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![
            ("kd_prov", region.province_code.as_str()),
            ("kd_kab", region.regency_code.as_str()),
        ];
        if let Some(year) = self.fiscal_year.as_deref() {
            params.push(("tahun", year));
        }
        params
    }
}

#[async_trait]
impl OutputDetailFetcher for SiskeudesClient {
    async fn fetch_output_details(&self, region: &Region) -> Result<Vec<OutputDetail>> {
        let mut request = self
            .client
            .get(&self.config.api_url)
            .query(&self.query_params(region));

        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        tracing::debug!("Requesting output details for {}", region);

        let response = request.send().await.map_err(|e| {
            tracing::error!("SISKEUDES request failed for {}: {:?}", region, e);
            AppError::ExternalServiceError(format!("SISKEUDES request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "SISKEUDES returned HTTP {} - {}",
                status, body
            )));
        }

        let body = response.text().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to read SISKEUDES response: {}", e))
        })?;

        let details = parse_payload(&body)?;

        tracing::debug!("Received {} output details for {}", details.len(), region);

        Ok(details)
    }
}

fn parse_payload(body: &str) -> Result<Vec<OutputDetail>> {
    serde_json::from_str::<OutputDetailPayload>(body)
        .map(OutputDetailPayload::into_details)
        .map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse SISKEUDES response: {}", e))
        })
}
