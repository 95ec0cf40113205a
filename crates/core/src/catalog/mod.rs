//! Series catalog - persisted series and the episodes they own.
//!
//! The catalog answers the read queries used by the HTTP API and the console
//! menu (partial matches, composite filters, top-N rankings, joins between
//! series and episodes) and applies the two write paths used by ingestion:
//! inserting a series and replacing its whole episode set.

mod category;
mod projection;
mod sqlite;
mod types;

pub use category::{Category, CategoryError};
pub use projection::{episode_views, series_views, EpisodeDetailDto, EpisodeDto, SeriesDto};
pub use sqlite::SqliteSeriesCatalog;
pub use types::*;

/// Number of entries returned by the "top" rankings.
pub const TOP_LIMIT: u32 = 5;

/// Trait for series catalog storage.
pub trait SeriesCatalog: Send + Sync {
    /// Insert a new series with no episodes.
    ///
    /// Fails with `AlreadyExists` if a series with the same title is stored.
    fn insert(&self, series: &NewSeries) -> Result<Series, CatalogError>;

    /// Replace the episode set of a series.
    ///
    /// All previous episodes of the series are removed and exactly `episodes`
    /// are attached, or nothing changes at all.
    fn replace_episodes(
        &self,
        series_id: i64,
        episodes: &[NewEpisode],
    ) -> Result<Vec<Episode>, CatalogError>;

    /// Delete a series and, by cascade, its episodes.
    fn delete(&self, series_id: i64) -> Result<(), CatalogError>;

    /// Get a series by id.
    fn get(&self, series_id: i64) -> Result<Option<Series>, CatalogError>;

    /// All stored series.
    fn list_all(&self) -> Result<Vec<Series>, CatalogError>;

    /// First series whose title contains `fragment`, ignoring case.
    ///
    /// When several titles match, the one inserted first wins.
    fn find_by_title(&self, fragment: &str) -> Result<Option<Series>, CatalogError>;

    /// Series whose cast contains `actor` (ignoring case) and whose rating is
    /// at least `min_rating`.
    fn find_by_actor_and_min_rating(
        &self,
        actor: &str,
        min_rating: f64,
    ) -> Result<Vec<Series>, CatalogError>;

    /// At most `limit` series, highest rating first.
    fn top_rated(&self, limit: u32) -> Result<Vec<Series>, CatalogError>;

    /// Series of exactly this genre.
    fn find_by_category(&self, category: Category) -> Result<Vec<Series>, CatalogError>;

    /// Series with at most `max_seasons` seasons and a rating of at least
    /// `min_rating`.
    fn find_by_max_seasons_and_min_rating(
        &self,
        max_seasons: u32,
        min_rating: f64,
    ) -> Result<Vec<Series>, CatalogError>;

    /// Episodes of any series whose title contains `fragment`, ignoring case.
    fn find_episodes_by_title(&self, fragment: &str) -> Result<Vec<Episode>, CatalogError>;

    /// At most `limit` episodes of one series, highest rating first.
    fn top_episodes(&self, series_id: i64, limit: u32) -> Result<Vec<Episode>, CatalogError>;

    /// At most `limit` distinct series, ordered by the release date of each
    /// series' most recent episode, newest first.
    ///
    /// Series are grouped before the limit is applied, so a series with many
    /// recent episodes still counts once.
    fn latest_releases(&self, limit: u32) -> Result<Vec<Series>, CatalogError>;

    /// All episodes of a series, ordered by season and number.
    fn episodes(&self, series_id: i64) -> Result<Vec<Episode>, CatalogError>;

    /// Episodes of one season of a series.
    fn season_episodes(&self, series_id: i64, season: u32) -> Result<Vec<Episode>, CatalogError>;

    /// Catalog statistics.
    fn stats(&self) -> Result<CatalogStats, CatalogError>;
}
