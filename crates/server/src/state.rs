use std::sync::Arc;

use screenmatch_core::{Config, SanitizedConfig, SeriesCatalog};

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<dyn SeriesCatalog>,
}

impl AppState {
    pub fn new(config: Config, catalog: Arc<dyn SeriesCatalog>) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn catalog(&self) -> &dyn SeriesCatalog {
        self.catalog.as_ref()
    }
}
