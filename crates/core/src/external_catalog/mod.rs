//! External metadata catalog integration (OMDb).
//!
//! Provides the client used to look up series and season metadata by title
//! before it is converted and stored in the local catalog.

mod omdb;
mod types;

pub use omdb::{OmdbClient, OmdbConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when interacting with the external catalog.
#[derive(Debug, Error)]
pub enum ExternalCatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// The catalog has no entry for the request.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Source of series and season metadata.
#[async_trait]
pub trait ExternalCatalog: Send + Sync {
    /// Look up a series by (exact) title.
    async fn fetch_series(&self, title: &str) -> Result<SeriesData, ExternalCatalogError>;

    /// Fetch one season of a series, including its episode list.
    async fn fetch_season(
        &self,
        title: &str,
        season: u32,
    ) -> Result<SeasonData, ExternalCatalogError>;
}
