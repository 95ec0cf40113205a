//! SQLite-backed series catalog implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Params};
use tracing::debug;

use super::{
    CatalogError, CatalogStats, Category, Episode, NewEpisode, NewSeries, Series, SeriesCatalog,
};
use crate::metrics::CATALOG_QUERIES;

const SERIES_COLUMNS: &str =
    "s.id, s.title, s.total_seasons, s.rating, s.genre, s.actors, s.poster, s.synopsis";

const EPISODE_COLUMNS: &str =
    "e.id, e.series_id, e.season, e.number, e.title, e.rating, e.release_date";

/// Release dates are stored as ISO text so that string order is date order.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed series catalog.
pub struct SqliteSeriesCatalog {
    conn: Mutex<Connection>,
}

impl SqliteSeriesCatalog {
    /// Open (or create) the catalog database at `path`.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path)?;
        Self::register_functions(&conn)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory()?;
        Self::register_functions(&conn)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// `ulower(text)`: Unicode lowercase. SQLite's own `LIKE` and `lower()`
    /// only fold ASCII letters.
    fn register_functions(conn: &Connection) -> Result<(), CatalogError> {
        conn.create_scalar_function(
            "ulower",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|text| text.to_lowercase())),
        )?;
        Ok(())
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS series (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL UNIQUE,
                total_seasons INTEGER NOT NULL DEFAULT 0,
                rating REAL NOT NULL DEFAULT 0,
                genre TEXT NOT NULL,
                actors TEXT NOT NULL DEFAULT '',
                poster TEXT NOT NULL DEFAULT '',
                synopsis TEXT NOT NULL DEFAULT ''
            );

            CREATE INDEX IF NOT EXISTS idx_series_rating ON series(rating);
            CREATE INDEX IF NOT EXISTS idx_series_genre ON series(genre);

            CREATE TABLE IF NOT EXISTS episodes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                series_id INTEGER NOT NULL REFERENCES series(id) ON DELETE CASCADE,
                season INTEGER NOT NULL,
                number INTEGER NOT NULL,
                title TEXT NOT NULL,
                rating REAL NOT NULL DEFAULT 0,
                release_date TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_episodes_series ON episodes(series_id);
            CREATE INDEX IF NOT EXISTS idx_episodes_release ON episodes(series_id, release_date);
            "#,
        )?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn
            .lock()
            .map_err(|_| CatalogError::Internal("catalog connection poisoned".to_string()))
    }

    fn row_to_series(row: &rusqlite::Row) -> rusqlite::Result<Series> {
        let genre: String = row.get(4)?;
        let genre = genre
            .parse::<Category>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

        Ok(Series {
            id: row.get(0)?,
            title: row.get(1)?,
            total_seasons: row.get(2)?,
            rating: row.get(3)?,
            genre,
            actors: row.get(5)?,
            poster: row.get(6)?,
            synopsis: row.get(7)?,
            episodes: Vec::new(), // Loaded separately
        })
    }

    fn row_to_episode(row: &rusqlite::Row) -> rusqlite::Result<Episode> {
        let release_date: Option<String> = row.get(6)?;

        Ok(Episode {
            id: row.get(0)?,
            series_id: row.get(1)?,
            season: row.get(2)?,
            number: row.get(3)?,
            title: row.get(4)?,
            rating: row.get(5)?,
            release_date: release_date
                .and_then(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT).ok()),
        })
    }

    /// Run a series query and attach each series' episodes.
    fn query_series<P: Params>(
        conn: &Connection,
        sql: &str,
        params: P,
    ) -> Result<Vec<Series>, CatalogError> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, Self::row_to_series)?;

        let mut results = Vec::new();
        for row in rows {
            let mut series = row?;
            series.episodes = Self::load_episodes(conn, series.id)?;
            results.push(series);
        }
        Ok(results)
    }

    fn query_episodes<P: Params>(
        conn: &Connection,
        sql: &str,
        params: P,
    ) -> Result<Vec<Episode>, CatalogError> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, Self::row_to_episode)?;

        let mut episodes = Vec::new();
        for row in rows {
            episodes.push(row?);
        }
        Ok(episodes)
    }

    fn load_episodes(conn: &Connection, series_id: i64) -> Result<Vec<Episode>, CatalogError> {
        Self::query_episodes(
            conn,
            &format!(
                "SELECT {EPISODE_COLUMNS} FROM episodes e
                 WHERE e.series_id = ?1
                 ORDER BY e.season, e.number, e.id"
            ),
            params![series_id],
        )
    }

    fn series_exists(conn: &Connection, series_id: i64) -> Result<bool, CatalogError> {
        let exists = conn
            .query_row(
                "SELECT 1 FROM series WHERE id = ?",
                params![series_id],
                |_| Ok(true),
            )
            .optional()?;
        Ok(exists.unwrap_or(false))
    }
}

/// Build a LIKE pattern matching `fragment` literally anywhere in the value.
///
/// The pattern is lowercased; compare it against `ulower(column)`.
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn observe(query: &str) {
    CATALOG_QUERIES.with_label_values(&[query]).inc();
}

impl SeriesCatalog for SqliteSeriesCatalog {
    fn insert(&self, series: &NewSeries) -> Result<Series, CatalogError> {
        observe("insert");
        let conn = self.lock()?;

        let exists = conn
            .query_row(
                "SELECT 1 FROM series WHERE title = ?",
                params![&series.title],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        if exists {
            return Err(CatalogError::AlreadyExists(series.title.clone()));
        }

        conn.execute(
            "INSERT INTO series (title, total_seasons, rating, genre, actors, poster, synopsis)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                &series.title,
                series.total_seasons,
                series.rating,
                series.genre.as_str(),
                &series.actors,
                &series.poster,
                &series.synopsis,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(id, title = %series.title, "Inserted series");

        Ok(Series {
            id,
            title: series.title.clone(),
            total_seasons: series.total_seasons,
            rating: series.rating,
            genre: series.genre,
            actors: series.actors.clone(),
            poster: series.poster.clone(),
            synopsis: series.synopsis.clone(),
            episodes: Vec::new(),
        })
    }

    fn replace_episodes(
        &self,
        series_id: i64,
        episodes: &[NewEpisode],
    ) -> Result<Vec<Episode>, CatalogError> {
        observe("replace_episodes");
        let mut conn = self.lock()?;
        // Dropping the transaction without commit rolls everything back.
        let tx = conn.transaction()?;

        if !Self::series_exists(&tx, series_id)? {
            return Err(CatalogError::NotFound(format!("series {}", series_id)));
        }

        let removed = tx.execute(
            "DELETE FROM episodes WHERE series_id = ?",
            params![series_id],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO episodes (series_id, season, number, title, rating, release_date)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )?;
            for episode in episodes {
                stmt.execute(params![
                    series_id,
                    episode.season,
                    episode.number,
                    &episode.title,
                    episode.rating,
                    episode
                        .release_date
                        .map(|d| d.format(DATE_FORMAT).to_string()),
                ])?;
            }
        }

        let stored = Self::load_episodes(&tx, series_id)?;
        tx.commit()?;

        debug!(
            series_id,
            removed,
            added = stored.len(),
            "Replaced episode set"
        );
        Ok(stored)
    }

    fn delete(&self, series_id: i64) -> Result<(), CatalogError> {
        observe("delete");
        let conn = self.lock()?;

        // Cascades to episodes
        let rows_affected = conn.execute("DELETE FROM series WHERE id = ?", params![series_id])?;

        if rows_affected == 0 {
            return Err(CatalogError::NotFound(format!("series {}", series_id)));
        }

        Ok(())
    }

    fn get(&self, series_id: i64) -> Result<Option<Series>, CatalogError> {
        observe("get");
        let conn = self.lock()?;

        let series = Self::query_series(
            &conn,
            &format!("SELECT {SERIES_COLUMNS} FROM series s WHERE s.id = ?1"),
            params![series_id],
        )?;
        Ok(series.into_iter().next())
    }

    fn list_all(&self) -> Result<Vec<Series>, CatalogError> {
        observe("list_all");
        let conn = self.lock()?;

        Self::query_series(
            &conn,
            &format!("SELECT {SERIES_COLUMNS} FROM series s ORDER BY s.id"),
            [],
        )
    }

    fn find_by_title(&self, fragment: &str) -> Result<Option<Series>, CatalogError> {
        observe("find_by_title");
        let conn = self.lock()?;

        let series = Self::query_series(
            &conn,
            &format!(
                "SELECT {SERIES_COLUMNS} FROM series s
                 WHERE ulower(s.title) LIKE ?1 ESCAPE '\\'
                 ORDER BY s.id
                 LIMIT 1"
            ),
            params![contains_pattern(fragment)],
        )?;
        Ok(series.into_iter().next())
    }

    fn find_by_actor_and_min_rating(
        &self,
        actor: &str,
        min_rating: f64,
    ) -> Result<Vec<Series>, CatalogError> {
        observe("find_by_actor_and_min_rating");
        let conn = self.lock()?;

        Self::query_series(
            &conn,
            &format!(
                "SELECT {SERIES_COLUMNS} FROM series s
                 WHERE ulower(s.actors) LIKE ?1 ESCAPE '\\' AND s.rating >= ?2
                 ORDER BY s.id"
            ),
            params![contains_pattern(actor), min_rating],
        )
    }

    fn top_rated(&self, limit: u32) -> Result<Vec<Series>, CatalogError> {
        observe("top_rated");
        let conn = self.lock()?;

        Self::query_series(
            &conn,
            &format!(
                "SELECT {SERIES_COLUMNS} FROM series s
                 ORDER BY s.rating DESC, s.id ASC
                 LIMIT ?1"
            ),
            params![limit],
        )
    }

    fn find_by_category(&self, category: Category) -> Result<Vec<Series>, CatalogError> {
        observe("find_by_category");
        let conn = self.lock()?;

        Self::query_series(
            &conn,
            &format!("SELECT {SERIES_COLUMNS} FROM series s WHERE s.genre = ?1 ORDER BY s.id"),
            params![category.as_str()],
        )
    }

    fn find_by_max_seasons_and_min_rating(
        &self,
        max_seasons: u32,
        min_rating: f64,
    ) -> Result<Vec<Series>, CatalogError> {
        observe("find_by_max_seasons_and_min_rating");
        let conn = self.lock()?;

        Self::query_series(
            &conn,
            &format!(
                "SELECT {SERIES_COLUMNS} FROM series s
                 WHERE s.total_seasons <= ?1 AND s.rating >= ?2
                 ORDER BY s.id"
            ),
            params![max_seasons, min_rating],
        )
    }

    fn find_episodes_by_title(&self, fragment: &str) -> Result<Vec<Episode>, CatalogError> {
        observe("find_episodes_by_title");
        let conn = self.lock()?;

        Self::query_episodes(
            &conn,
            &format!(
                "SELECT {EPISODE_COLUMNS} FROM series s
                 JOIN episodes e ON e.series_id = s.id
                 WHERE ulower(e.title) LIKE ?1 ESCAPE '\\'
                 ORDER BY s.id, e.season, e.number"
            ),
            params![contains_pattern(fragment)],
        )
    }

    fn top_episodes(&self, series_id: i64, limit: u32) -> Result<Vec<Episode>, CatalogError> {
        observe("top_episodes");
        let conn = self.lock()?;

        Self::query_episodes(
            &conn,
            &format!(
                "SELECT {EPISODE_COLUMNS} FROM series s
                 JOIN episodes e ON e.series_id = s.id
                 WHERE s.id = ?1
                 ORDER BY e.rating DESC, e.season, e.number
                 LIMIT ?2"
            ),
            params![series_id, limit],
        )
    }

    fn latest_releases(&self, limit: u32) -> Result<Vec<Series>, CatalogError> {
        observe("latest_releases");
        let conn = self.lock()?;

        // Group per series first so one series cannot take several slots.
        Self::query_series(
            &conn,
            &format!(
                "SELECT {SERIES_COLUMNS} FROM series s
                 JOIN episodes e ON e.series_id = s.id
                 WHERE e.release_date IS NOT NULL
                 GROUP BY s.id
                 ORDER BY MAX(e.release_date) DESC, s.id ASC
                 LIMIT ?1"
            ),
            params![limit],
        )
    }

    fn episodes(&self, series_id: i64) -> Result<Vec<Episode>, CatalogError> {
        observe("episodes");
        let conn = self.lock()?;
        Self::load_episodes(&conn, series_id)
    }

    fn season_episodes(&self, series_id: i64, season: u32) -> Result<Vec<Episode>, CatalogError> {
        observe("season_episodes");
        let conn = self.lock()?;

        Self::query_episodes(
            &conn,
            &format!(
                "SELECT {EPISODE_COLUMNS} FROM episodes e
                 WHERE e.series_id = ?1 AND e.season = ?2
                 ORDER BY e.number, e.id"
            ),
            params![series_id, season],
        )
    }

    fn stats(&self) -> Result<CatalogStats, CatalogError> {
        let conn = self.lock()?;

        let total_series: i64 =
            conn.query_row("SELECT COUNT(*) FROM series", [], |row| row.get(0))?;
        let total_episodes: i64 =
            conn.query_row("SELECT COUNT(*) FROM episodes", [], |row| row.get(0))?;

        Ok(CatalogStats {
            total_series: total_series as u64,
            total_episodes: total_episodes as u64,
        })
    }
}
