//! Conversion from external metadata to storable records.
//!
//! Missing or malformed values are defaulted rather than rejected: ratings
//! fall back to 0.0, release dates to `None`. The one hard failure is a
//! genre outside the known category set.

use chrono::NaiveDate;

use crate::catalog::{Category, CategoryError, NewEpisode, NewSeries};
use crate::external_catalog::{EpisodeData, SeriesData};

/// Synopsis stored when the source has none.
pub const MISSING_SYNOPSIS: &str = "Sinopse não disponível";

/// Genre assumed when the source lists none.
pub const DEFAULT_CATEGORY: Category = Category::Action;

/// Parse a rating string; anything unusable becomes 0.0.
pub fn parse_rating(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .filter(|s| !s.is_empty() && *s != "N/A")
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|r| r.is_finite())
        .unwrap_or(0.0)
}

/// Parse an ISO `YYYY-MM-DD` date; anything else becomes `None`.
pub fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

/// The first entry of a comma-separated genre list.
pub fn primary_genre(raw: Option<&str>) -> Result<Category, CategoryError> {
    let first = raw
        .and_then(|g| g.split(',').next())
        .map(str::trim)
        .unwrap_or_default();

    if first.is_empty() {
        return Ok(DEFAULT_CATEGORY);
    }
    Category::from_source_label(first)
}

/// Build a series record. `synopsis` is the final (possibly translated) text.
pub fn to_new_series(data: &SeriesData, synopsis: String) -> Result<NewSeries, CategoryError> {
    Ok(NewSeries {
        title: data.title.trim().to_string(),
        total_seasons: data.total_seasons.unwrap_or(0),
        rating: parse_rating(data.rating.as_deref()),
        genre: primary_genre(data.genre.as_deref())?,
        actors: data.actors.clone().unwrap_or_default(),
        poster: data.poster.clone().unwrap_or_default(),
        synopsis,
    })
}

/// Build an episode record for the given season.
pub fn to_new_episode(season: u32, data: &EpisodeData) -> NewEpisode {
    NewEpisode {
        season,
        number: data.number.unwrap_or(0),
        title: data.title.clone(),
        rating: parse_rating(data.rating.as_deref()),
        release_date: parse_release_date(data.released.as_deref()),
    }
}
