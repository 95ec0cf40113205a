//! Ingestion of external metadata into the series catalog.
//!
//! A [`SeriesIngestor`] looks series up in an [`ExternalCatalog`], converts
//! the result, optionally translates the synopsis, and writes it to a
//! [`SeriesCatalog`]. Episode sets are always collected in full before the
//! stored set is swapped, so a failed import leaves the old episodes intact.

mod convert;

pub use convert::{
    parse_rating, parse_release_date, primary_genre, to_new_episode, to_new_series,
    DEFAULT_CATEGORY, MISSING_SYNOPSIS,
};

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogError, CategoryError, Episode, NewEpisode, Series, SeriesCatalog};
use crate::external_catalog::{ExternalCatalog, ExternalCatalogError};
use crate::metrics::{EPISODES_INGESTED, INGESTIONS_TOTAL};
use crate::translation::Translator;

/// Errors that can occur while importing series or episodes.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Metadata lookup failed: {0}")]
    Source(#[from] ExternalCatalogError),

    #[error("Unsupported genre: {0}")]
    Category(#[from] CategoryError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Series {0} is not in the catalog")]
    SeriesNotFound(i64),

    #[error("No episodes found for '{0}'")]
    NoEpisodes(String),
}

/// Imports series and their episodes from an external catalog.
pub struct SeriesIngestor {
    source: Arc<dyn ExternalCatalog>,
    catalog: Arc<dyn SeriesCatalog>,
    translator: Option<Arc<dyn Translator>>,
}

impl SeriesIngestor {
    pub fn new(source: Arc<dyn ExternalCatalog>, catalog: Arc<dyn SeriesCatalog>) -> Self {
        Self {
            source,
            catalog,
            translator: None,
        }
    }

    /// Translate synopses with the given translator before storing.
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Fetch a series by name and store it.
    pub async fn ingest_series(&self, name: &str) -> Result<Series, IngestError> {
        let result = self.import_series(name).await;
        record("series", result.is_ok());
        result
    }

    /// Fetch every season of a stored series and replace its episode set.
    pub async fn ingest_episodes(&self, series_id: i64) -> Result<Vec<Episode>, IngestError> {
        let result = self.import_episodes(series_id).await;
        record("episodes", result.is_ok());
        if let Ok(episodes) = &result {
            EPISODES_INGESTED.observe(episodes.len() as f64);
        }
        result
    }

    async fn import_series(&self, name: &str) -> Result<Series, IngestError> {
        let data = self.source.fetch_series(name.trim()).await?;
        debug!(title = %data.title, "Fetched series metadata");

        let synopsis = match data.plot.as_deref() {
            Some(plot) => self.translate(plot).await,
            None => MISSING_SYNOPSIS.to_string(),
        };

        let new_series = to_new_series(&data, synopsis)?;
        let series = self.catalog.insert(&new_series)?;

        info!(id = series.id, title = %series.title, genre = %series.genre, "Stored series");
        Ok(series)
    }

    async fn import_episodes(&self, series_id: i64) -> Result<Vec<Episode>, IngestError> {
        let series = self
            .catalog
            .get(series_id)?
            .ok_or(IngestError::SeriesNotFound(series_id))?;

        let mut collected: Vec<NewEpisode> = Vec::new();
        for season in 1..=series.total_seasons {
            let data = match self.source.fetch_season(&series.title, season).await {
                Ok(data) => data,
                // Unknown seasons carry no episode list
                Err(ExternalCatalogError::NotFound(reason)) => {
                    debug!(title = %series.title, season, %reason, "Season not found, skipping");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let Some(episodes) = data.episodes else {
                debug!(title = %series.title, season, "Season has no episode list, skipping");
                continue;
            };

            collected.extend(episodes.iter().map(|e| to_new_episode(season, e)));
        }

        if collected.is_empty() {
            return Err(IngestError::NoEpisodes(series.title));
        }

        let stored = self.catalog.replace_episodes(series.id, &collected)?;
        info!(
            id = series.id,
            title = %series.title,
            episodes = stored.len(),
            "Stored episodes"
        );
        Ok(stored)
    }

    /// Translate text, keeping the original when the translator fails.
    async fn translate(&self, text: &str) -> String {
        let Some(translator) = &self.translator else {
            return text.to_string();
        };

        match translator.translate(text).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(error = %e, "Synopsis translation failed, keeping original text");
                text.to_string()
            }
        }
    }
}

fn record(kind: &str, success: bool) {
    INGESTIONS_TOTAL
        .with_label_values(&[kind, if success { "success" } else { "failed" }])
        .inc();
}
