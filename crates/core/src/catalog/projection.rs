//! Boundary views of catalog records.
//!
//! These views never carry the episode -> series back-reference as a nested
//! object, and a series view never embeds its episodes. Episodes are listed
//! through their own views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Category, Episode, Series};

/// Series view without episodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDto {
    pub id: i64,
    pub title: String,
    pub total_seasons: u32,
    pub rating: f64,
    pub genre: Category,
    pub actors: String,
    pub poster: String,
    pub synopsis: String,
}

impl From<&Series> for SeriesDto {
    fn from(s: &Series) -> Self {
        Self {
            id: s.id,
            title: s.title.clone(),
            total_seasons: s.total_seasons,
            rating: s.rating,
            genre: s.genre,
            actors: s.actors.clone(),
            poster: s.poster.clone(),
            synopsis: s.synopsis.clone(),
        }
    }
}

/// Lightweight episode listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeDto {
    pub season: u32,
    pub number: u32,
    pub title: String,
}

impl From<&Episode> for EpisodeDto {
    fn from(e: &Episode) -> Self {
        Self {
            season: e.season,
            number: e.number,
            title: e.title.clone(),
        }
    }
}

/// Full episode view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeDetailDto {
    pub id: i64,
    pub series_id: i64,
    pub season: u32,
    pub number: u32,
    pub title: String,
    pub rating: f64,
    pub release_date: Option<NaiveDate>,
}

impl From<&Episode> for EpisodeDetailDto {
    fn from(e: &Episode) -> Self {
        Self {
            id: e.id,
            series_id: e.series_id,
            season: e.season,
            number: e.number,
            title: e.title.clone(),
            rating: e.rating,
            release_date: e.release_date,
        }
    }
}

/// Convert a list of series into views.
pub fn series_views(series: &[Series]) -> Vec<SeriesDto> {
    series.iter().map(SeriesDto::from).collect()
}

/// Convert a list of episodes into lightweight views.
pub fn episode_views(episodes: &[Episode]) -> Vec<EpisodeDto> {
    episodes.iter().map(EpisodeDto::from).collect()
}
