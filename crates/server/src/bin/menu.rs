use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use screenmatch_core::{
    load_config, validate_config, Config, MyMemoryTranslator, OmdbClient, SeriesCatalog,
    SeriesIngestor, SqliteSeriesCatalog,
};
use screenmatch_server::menu::Menu;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        eprintln!("Erro: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Quiet by default so log lines do not interleave with the menu
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config_path = std::env::var("SCREENMATCH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    let catalog: Arc<dyn SeriesCatalog> = Arc::new(
        SqliteSeriesCatalog::new(&config.database.path)
            .context("Failed to open series catalog")?,
    );

    let ingestor = build_ingestor(&config, Arc::clone(&catalog))?;

    let stdin = io::stdin();
    let mut menu = Menu::new(catalog, ingestor, stdin.lock(), io::stdout());
    menu.run().await
}

/// Wire OMDb (and translation, when enabled) into an ingestor.
///
/// The `[omdb]` section may also come from `SCREENMATCH_OMDB__API_KEY`.
fn build_ingestor(
    config: &Config,
    catalog: Arc<dyn SeriesCatalog>,
) -> Result<Option<SeriesIngestor>> {
    let Some(omdb_config) = config.omdb.clone() else {
        info!("OMDb not configured, ingestion disabled");
        return Ok(None);
    };

    let source = OmdbClient::new(omdb_config).context("Failed to create OMDb client")?;
    let mut ingestor = SeriesIngestor::new(Arc::new(source), catalog);

    if let Some(translation) = config.translation.as_ref().filter(|t| t.enabled) {
        let translator = MyMemoryTranslator::new(translation.clone())
            .context("Failed to create translation client")?;
        info!("Synopsis translation enabled ({})", translation.langpair);
        ingestor = ingestor.with_translator(Arc::new(translator));
    }

    Ok(Some(ingestor))
}
