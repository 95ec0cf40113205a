//! Types for the series catalog.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Category;

/// A stored series together with the episodes it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Surrogate id assigned on insert.
    pub id: i64,
    /// Title (unique across the catalog).
    pub title: String,
    /// Total number of seasons.
    pub total_seasons: u32,
    /// Rating, 0.0 when the source had none.
    pub rating: f64,
    /// Genre.
    pub genre: Category,
    /// Cast, free text.
    pub actors: String,
    /// Poster URL.
    pub poster: String,
    /// Synopsis, possibly machine-translated.
    pub synopsis: String,
    /// Owned episodes, in no particular order.
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// A stored episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Surrogate id.
    pub id: i64,
    /// Owning series.
    pub series_id: i64,
    /// Season number.
    pub season: u32,
    /// Episode number within the season.
    pub number: u32,
    /// Episode title.
    pub title: String,
    /// Rating, 0.0 when the source had none.
    pub rating: f64,
    /// Release date, if the source had a parsable one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
}

/// A series about to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSeries {
    pub title: String,
    pub total_seasons: u32,
    pub rating: f64,
    pub genre: Category,
    pub actors: String,
    pub poster: String,
    pub synopsis: String,
}

/// An episode about to be attached to a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEpisode {
    pub season: u32,
    pub number: u32,
    pub title: String,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
}

/// Catalog statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Stored series.
    pub total_series: u64,
    /// Stored episodes.
    pub total_episodes: u64,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Series already exists: {0}")]
    AlreadyExists(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for CatalogError {
    fn from(e: rusqlite::Error) -> Self {
        CatalogError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_without_date_skips_field() {
        let episode = Episode {
            id: 1,
            series_id: 1,
            season: 1,
            number: 1,
            title: "Pilot".to_string(),
            rating: 0.0,
            release_date: None,
        };

        let json = serde_json::to_string(&episode).unwrap();
        assert!(!json.contains("release_date"));
    }

    #[test]
    fn test_episode_date_serializes_as_iso() {
        let episode = NewEpisode {
            season: 1,
            number: 1,
            title: "Pilot".to_string(),
            rating: 9.0,
            release_date: NaiveDate::from_ymd_opt(2008, 1, 20),
        };

        let json = serde_json::to_string(&episode).unwrap();
        assert!(json.contains("\"release_date\":\"2008-01-20\""));
    }

    #[test]
    fn test_series_genre_serializes_canonical_name() {
        let series = Series {
            id: 7,
            title: "Dark".to_string(),
            total_seasons: 3,
            rating: 8.7,
            genre: Category::ScienceFiction,
            actors: "Louis Hofmann".to_string(),
            poster: String::new(),
            synopsis: String::new(),
            episodes: vec![],
        };

        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["genre"], "SCIENCE_FICTION");
    }
}
