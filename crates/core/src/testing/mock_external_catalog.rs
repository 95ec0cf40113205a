//! Mock external catalog for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::external_catalog::{ExternalCatalog, ExternalCatalogError, SeasonData, SeriesData};

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCatalogQuery {
    FetchSeries { title: String },
    FetchSeason { title: String, season: u32 },
}

/// Mock implementation of the ExternalCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable series and season data
/// - Track queries for assertions
/// - Simulate failures, either once or for a specific season
///
/// Titles are matched case-insensitively, the way OMDb resolves `t=`.
///
/// # Example
///
/// ```rust,ignore
/// use screenmatch_core::testing::{MockExternalCatalog, fixtures};
///
/// let catalog = MockExternalCatalog::new();
/// catalog.add_series(fixtures::series_data("Dark", 3)).await;
/// catalog.add_season("Dark", fixtures::season_data(1, 10)).await;
///
/// let season = catalog.fetch_season("dark", 1).await?;
/// assert_eq!(season.episodes.unwrap().len(), 10);
/// ```
#[derive(Debug)]
pub struct MockExternalCatalog {
    /// Series by lowercased title.
    series: Arc<RwLock<HashMap<String, SeriesData>>>,
    /// Seasons by (lowercased title, season number).
    seasons: Arc<RwLock<HashMap<(String, u32), SeasonData>>>,
    /// Seasons that always fail with an API error.
    failing_seasons: Arc<RwLock<HashSet<(String, u32)>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedCatalogQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ExternalCatalogError>>>,
}

impl Default for MockExternalCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExternalCatalog {
    /// Create a new empty mock external catalog.
    pub fn new() -> Self {
        Self {
            series: Arc::new(RwLock::new(HashMap::new())),
            seasons: Arc::new(RwLock::new(HashMap::new())),
            failing_seasons: Arc::new(RwLock::new(HashSet::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Add series metadata.
    pub async fn add_series(&self, series: SeriesData) {
        self.series
            .write()
            .await
            .insert(series.title.to_lowercase(), series);
    }

    /// Add a season for the given series title.
    ///
    /// The season number is taken from `season.season`.
    pub async fn add_season(&self, title: &str, season: SeasonData) {
        let number = season.season.unwrap_or_default();
        self.seasons
            .write()
            .await
            .insert((title.to_lowercase(), number), season);
    }

    /// Make every fetch of this season fail.
    pub async fn fail_season(&self, title: &str, season: u32) {
        self.failing_seasons
            .write()
            .await
            .insert((title.to_lowercase(), season));
    }

    /// Clear all series and seasons.
    pub async fn clear(&self) {
        self.series.write().await.clear();
        self.seasons.write().await.clear();
        self.failing_seasons.write().await.clear();
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedCatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Clear recorded queries.
    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ExternalCatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<ExternalCatalogError> {
        self.next_error.write().await.take()
    }

    /// Record a query.
    async fn record(&self, query: RecordedCatalogQuery) {
        self.queries.write().await.push(query);
    }
}

#[async_trait]
impl ExternalCatalog for MockExternalCatalog {
    async fn fetch_series(&self, title: &str) -> Result<SeriesData, ExternalCatalogError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedCatalogQuery::FetchSeries {
            title: title.to_string(),
        })
        .await;

        self.series
            .read()
            .await
            .get(&title.to_lowercase())
            .cloned()
            .ok_or_else(|| ExternalCatalogError::NotFound("Series not found!".to_string()))
    }

    async fn fetch_season(
        &self,
        title: &str,
        season: u32,
    ) -> Result<SeasonData, ExternalCatalogError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedCatalogQuery::FetchSeason {
            title: title.to_string(),
            season,
        })
        .await;

        let key = (title.to_lowercase(), season);
        if self.failing_seasons.read().await.contains(&key) {
            return Err(ExternalCatalogError::ApiError {
                status: 503,
                message: format!("season {} unavailable", season),
            });
        }

        self.seasons
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| {
                ExternalCatalogError::NotFound("Series or season not found!".to_string())
            })
    }
}
