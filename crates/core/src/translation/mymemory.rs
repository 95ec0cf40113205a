//! MyMemory translation API client.
//!
//! The free tier needs no key; status is reported in-band through
//! `responseStatus`, which may arrive as a number or a string.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{TranslationError, Translator};
use crate::metrics::{EXTERNAL_SERVICE_DURATION, EXTERNAL_SERVICE_REQUESTS};

/// MyMemory translation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyMemoryConfig {
    /// When false, synopses are stored untranslated.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Source and target languages, e.g. `en|pt-br`.
    #[serde(default = "default_langpair")]
    pub langpair: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for MyMemoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            langpair: default_langpair(),
            base_url: default_base_url(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_langpair() -> String {
    "en|pt-br".to_string()
}

fn default_base_url() -> String {
    "https://api.mymemory.translated.net/get".to_string()
}

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: Option<MyMemoryData>,
    #[serde(rename = "responseStatus", default)]
    response_status: Option<serde_json::Value>,
    #[serde(rename = "responseDetails", default)]
    response_details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MyMemoryData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

/// MyMemory translation client.
pub struct MyMemoryTranslator {
    client: Client,
    base_url: String,
    langpair: String,
}

impl MyMemoryTranslator {
    pub fn new(config: MyMemoryConfig) -> Result<Self, TranslationError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
            langpair: config.langpair,
        })
    }

    async fn request(&self, text: &str) -> Result<String, TranslationError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", text), ("langpair", self.langpair.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_translation(&body)
    }
}

fn parse_translation(body: &str) -> Result<String, TranslationError> {
    let parsed: MyMemoryResponse = serde_json::from_str(body).map_err(|e| {
        TranslationError::ParseError(format!("Failed to parse translation response: {}", e))
    })?;

    let status = parsed
        .response_status
        .as_ref()
        .and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
        .unwrap_or(200);

    if status != 200 {
        return Err(TranslationError::ApiError {
            status: u16::try_from(status).unwrap_or(u16::MAX),
            message: parsed
                .response_details
                .map(|d| d.to_string())
                .unwrap_or_default(),
        });
    }

    parsed
        .response_data
        .and_then(|d| d.translated_text)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| TranslationError::ParseError("missing translatedText".to_string()))
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        debug!(langpair = %self.langpair, chars = text.len(), "Translating text");

        let start = Instant::now();
        let result = self.request(text).await;

        EXTERNAL_SERVICE_DURATION
            .with_label_values(&["mymemory", "translate"])
            .observe(start.elapsed().as_secs_f64());
        EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&[
                "mymemory",
                "translate",
                if result.is_ok() { "success" } else { "error" },
            ])
            .inc();

        result
    }
}
