//! OMDb (Open Movie Database) API client.
//!
//! OMDb requires an API key and answers every lookup with HTTP 200; misses
//! are signalled in-band with `{"Response": "False", "Error": "..."}`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{SeasonData, SeriesData};
use super::{ExternalCatalog, ExternalCatalogError};
use crate::metrics::{EXTERNAL_SERVICE_DURATION, EXTERNAL_SERVICE_REQUESTS};

/// OMDb API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    /// OMDb API key (required).
    pub api_key: String,
    /// Base URL (default: https://www.omdbapi.com/).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
}

impl OmdbConfig {
    /// Config with the given key and default endpoint settings.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.omdbapi.com/".to_string()
}

fn default_timeout_secs() -> u32 {
    30
}

/// In-band status carried by every OMDb response body.
#[derive(Debug, Deserialize)]
struct OmdbStatus {
    #[serde(rename = "Response", default)]
    response: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

/// OMDb API client.
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    /// Create a new OMDb client.
    pub fn new(config: OmdbConfig) -> Result<Self, ExternalCatalogError> {
        if config.api_key.trim().is_empty() {
            return Err(ExternalCatalogError::NotConfigured(
                "OMDb API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    async fn lookup<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &[(&str, String)],
    ) -> Result<T, ExternalCatalogError> {
        let start = Instant::now();
        let result = self.send(query).await;

        EXTERNAL_SERVICE_DURATION
            .with_label_values(&["omdb", operation])
            .observe(start.elapsed().as_secs_f64());
        EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&[
                "omdb",
                operation,
                if result.is_ok() { "success" } else { "error" },
            ])
            .inc();

        parse_body(&result?)
    }

    async fn send(&self, query: &[(&str, String)]) -> Result<String, ExternalCatalogError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(query)
            .query(&[("apikey", &self.api_key)])
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(ExternalCatalogError::NotConfigured(
                "Invalid OMDb API key".to_string(),
            ));
        }
        if status == 429 {
            return Err(ExternalCatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalCatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

/// Decode an OMDb body, turning an in-band failure into `NotFound`.
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ExternalCatalogError> {
    let status: OmdbStatus = serde_json::from_str(body).map_err(|e| {
        ExternalCatalogError::ParseError(format!("Failed to parse OMDb response: {}", e))
    })?;

    if status
        .response
        .as_deref()
        .is_some_and(|r| r.eq_ignore_ascii_case("false"))
    {
        return Err(ExternalCatalogError::NotFound(
            status.error.unwrap_or_else(|| "no result".to_string()),
        ));
    }

    serde_json::from_str(body).map_err(|e| {
        ExternalCatalogError::ParseError(format!("Failed to parse OMDb response: {}", e))
    })
}

#[async_trait]
impl ExternalCatalog for OmdbClient {
    async fn fetch_series(&self, title: &str) -> Result<SeriesData, ExternalCatalogError> {
        debug!("OMDb series lookup: title='{}'", title);
        self.lookup("series", &[("t", title.to_string())]).await
    }

    async fn fetch_season(
        &self,
        title: &str,
        season: u32,
    ) -> Result<SeasonData, ExternalCatalogError> {
        debug!("OMDb season lookup: title='{}', season={}", title, season);
        self.lookup(
            "season",
            &[("t", title.to_string()), ("season", season.to_string())],
        )
        .await
    }
}
