//! Series and episode API handlers.
//!
//! Unknown series ids answer `200` with a JSON `null` body rather than 404,
//! which is what the browser front-end expects.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use screenmatch_core::catalog::{episode_views, series_views};
use screenmatch_core::{CatalogError, Category, EpisodeDetailDto, EpisodeDto, SeriesDto, TOP_LIMIT};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct EpisodeSearchParams {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryErrorResponse {
    pub error: String,
    pub valid_categories: Vec<&'static str>,
}

fn internal_error(e: CatalogError) -> Response {
    tracing::error!("Catalog query failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /series
///
/// All stored series.
pub async fn list_series(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SeriesDto>>, Response> {
    let series = state.catalog().list_all().map_err(internal_error)?;
    Ok(Json(series_views(&series)))
}

/// GET /series/top5
pub async fn top_series(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SeriesDto>>, Response> {
    let series = state.catalog().top_rated(TOP_LIMIT).map_err(internal_error)?;
    Ok(Json(series_views(&series)))
}

/// GET /series/releases
///
/// Series with the most recently released episodes.
pub async fn latest_releases(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SeriesDto>>, Response> {
    let series = state
        .catalog()
        .latest_releases(TOP_LIMIT)
        .map_err(internal_error)?;
    Ok(Json(series_views(&series)))
}

/// GET /series/{id}
pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Option<SeriesDto>>, Response> {
    let series = state.catalog().get(id).map_err(internal_error)?;
    Ok(Json(series.as_ref().map(SeriesDto::from)))
}

/// GET /series/{id}/seasons/all
pub async fn all_episodes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Option<Vec<EpisodeDto>>>, Response> {
    let series = state.catalog().get(id).map_err(internal_error)?;
    Ok(Json(series.map(|s| episode_views(&s.episodes))))
}

/// GET /series/{id}/seasons/top
pub async fn top_episodes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Option<Vec<EpisodeDto>>>, Response> {
    let catalog = state.catalog();
    if catalog.get(id).map_err(internal_error)?.is_none() {
        return Ok(Json(None));
    }

    let episodes = catalog.top_episodes(id, TOP_LIMIT).map_err(internal_error)?;
    Ok(Json(Some(episode_views(&episodes))))
}

/// GET /series/{id}/seasons/{number}
pub async fn season_episodes(
    State(state): State<Arc<AppState>>,
    Path((id, number)): Path<(i64, u32)>,
) -> Result<Json<Vec<EpisodeDto>>, Response> {
    let episodes = state
        .catalog()
        .season_episodes(id, number)
        .map_err(internal_error)?;
    Ok(Json(episode_views(&episodes)))
}

/// GET /series/category/{name}
///
/// Accepts either the display label or the source label, case-insensitive.
pub async fn series_by_category(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<SeriesDto>>, Response> {
    let category = Category::from_label(&name).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(CategoryErrorResponse {
                error: e.to_string(),
                valid_categories: Category::ALL.iter().map(|c| c.display_label()).collect(),
            }),
        )
            .into_response()
    })?;

    let series = state
        .catalog()
        .find_by_category(category)
        .map_err(internal_error)?;
    Ok(Json(series_views(&series)))
}

/// GET /episodes?title=...
///
/// Episodes whose title contains the fragment, across all series.
pub async fn search_episodes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EpisodeSearchParams>,
) -> Result<Json<Vec<EpisodeDetailDto>>, Response> {
    let episodes = state
        .catalog()
        .find_episodes_by_title(&params.title)
        .map_err(internal_error)?;
    Ok(Json(episodes.iter().map(EpisodeDetailDto::from).collect()))
}
