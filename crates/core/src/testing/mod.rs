//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external service traits,
//! allowing ingestion and API tests to run without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use screenmatch_core::testing::{fixtures, MockExternalCatalog, MockTranslator};
//!
//! let source = MockExternalCatalog::new();
//! source.add_series(fixtures::series_data("Dark", 3)).await;
//! for season in 1..=3 {
//!     source.add_season("Dark", fixtures::season_data(season, 8)).await;
//! }
//!
//! // Hand to a SeriesIngestor...
//! ```

mod mock_external_catalog;
mod mock_translator;

pub use mock_external_catalog::{MockExternalCatalog, RecordedCatalogQuery};
pub use mock_translator::MockTranslator;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::NaiveDate;

    use crate::catalog::{Category, NewEpisode, NewSeries};
    use crate::external_catalog::{EpisodeData, SeasonData, SeriesData};

    /// Series metadata as OMDb would return it.
    pub fn series_data(title: &str, seasons: u32) -> SeriesData {
        SeriesData {
            title: title.to_string(),
            total_seasons: Some(seasons),
            rating: Some("8.5".to_string()),
            genre: Some("Drama, Mystery".to_string()),
            actors: Some("Louis Hofmann, Karoline Eichhorn".to_string()),
            poster: Some(format!(
                "https://img.example.com/{}.jpg",
                title.to_lowercase().replace(' ', "-")
            )),
            plot: Some(format!("A series called {}.", title)),
        }
    }

    /// A season with `episodes` entries, season N airing in January of 2019+N.
    pub fn season_data(season: u32, episodes: u32) -> SeasonData {
        SeasonData {
            season: Some(season),
            episodes: Some(
                (1..=episodes)
                    .map(|e| EpisodeData {
                        title: format!("S{:02}E{:02}", season, e),
                        number: Some(e),
                        rating: Some(format!("{:.1}", 7.0 + (e % 3) as f64)),
                        released: Some(format!("{}-01-{:02}", 2019 + season, e.min(28))),
                    })
                    .collect(),
            ),
        }
    }

    /// A season the catalog knows about but has no episode list for.
    pub fn empty_season(season: u32) -> SeasonData {
        SeasonData {
            season: Some(season),
            episodes: None,
        }
    }

    /// A stored-series request with reasonable defaults.
    pub fn new_series(title: &str, rating: f64, genre: Category) -> NewSeries {
        NewSeries {
            title: title.to_string(),
            total_seasons: 2,
            rating,
            genre,
            actors: "Jane Doe, John Roe".to_string(),
            poster: format!("https://img.example.com/{}.jpg", title.len()),
            synopsis: format!("Sinopse de {}.", title),
        }
    }

    /// An episode released on the given date (`None` for unknown).
    pub fn new_episode(
        season: u32,
        number: u32,
        title: &str,
        rating: f64,
        released: Option<(i32, u32, u32)>,
    ) -> NewEpisode {
        NewEpisode {
            season,
            number,
            title: title.to_string(),
            rating,
            release_date: released.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        }
    }
}
