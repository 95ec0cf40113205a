use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use screenmatch_core::config::CorsConfig;

use super::middleware::metrics_middleware;
use super::{handlers, series};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config().cors);

    Router::new()
        .route("/", get(handlers::welcome))
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Series
        .route("/series", get(series::list_series))
        .route("/series/top5", get(series::top_series))
        .route("/series/releases", get(series::latest_releases))
        .route("/series/category/{name}", get(series::series_by_category))
        .route("/series/{id}", get(series::get_series))
        .route("/series/{id}/seasons/all", get(series::all_episodes))
        .route("/series/{id}/seasons/top", get(series::top_episodes))
        .route("/series/{id}/seasons/{number}", get(series::season_episodes))
        // Episodes
        .route("/episodes", get(series::search_episodes))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// CORS for the browser front-end. `*` allows any origin.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods([Method::GET]);

    if config.allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
