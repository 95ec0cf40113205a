//! Machine translation of synopsis text.

mod mymemory;

pub use mymemory::{MyMemoryConfig, MyMemoryTranslator};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while translating text.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Translates free text into the configured target language.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String, TranslationError>;
}
