pub mod catalog;
pub mod config;
pub mod external_catalog;
pub mod ingest;
pub mod metrics;
pub mod testing;
pub mod translation;

pub use catalog::{
    Category, CategoryError, CatalogError, Episode, EpisodeDetailDto, EpisodeDto, NewEpisode,
    NewSeries, Series, SeriesCatalog, SeriesDto, SqliteSeriesCatalog, TOP_LIMIT,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use external_catalog::{ExternalCatalog, ExternalCatalogError, OmdbClient, OmdbConfig};
pub use ingest::{IngestError, SeriesIngestor};
pub use translation::{MyMemoryConfig, MyMemoryTranslator, TranslationError, Translator};
