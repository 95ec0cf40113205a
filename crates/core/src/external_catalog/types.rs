//! Types for OMDb API responses.
//!
//! OMDb reports every scalar as a string and uses `"N/A"` for missing
//! values, so numeric fields are parsed leniently and text fields map
//! `"N/A"` to `None`. Ratings and dates stay raw; the ingestion layer
//! decides how to default them.

use serde::{Deserialize, Deserializer, Serialize};

/// Series-level metadata as returned by a title lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesData {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(
        rename = "totalSeasons",
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_seasons: Option<u32>,
    /// Raw rating text, e.g. `"9.5"` or `"N/A"`.
    #[serde(rename = "imdbRating", default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    /// Comma-separated genre list, e.g. `"Crime, Drama, Thriller"`.
    #[serde(
        rename = "Genre",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub genre: Option<String>,
    #[serde(
        rename = "Actors",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub actors: Option<String>,
    #[serde(
        rename = "Poster",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub poster: Option<String>,
    #[serde(
        rename = "Plot",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub plot: Option<String>,
}

/// One season of a series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonData {
    #[serde(
        rename = "Season",
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub season: Option<u32>,
    /// Absent when the catalog knows the season but not its episodes.
    #[serde(rename = "Episodes", default, skip_serializing_if = "Option::is_none")]
    pub episodes: Option<Vec<EpisodeData>>,
}

/// An episode entry inside a season listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EpisodeData {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(
        rename = "Episode",
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<u32>,
    #[serde(rename = "imdbRating", default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    /// Raw release date text, usually `YYYY-MM-DD`.
    #[serde(rename = "Released", default, skip_serializing_if = "Option::is_none")]
    pub released: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Number(u64),
    Text(String),
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<StringOrNumber> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(StringOrNumber::Number(n)) => u32::try_from(n).ok(),
        Some(StringOrNumber::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| {
        let s = s.trim();
        !s.is_empty() && s != "N/A"
    }))
}
