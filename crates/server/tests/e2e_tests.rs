//! End-to-end tests of the read API.
//!
//! These tests run the full router stack in-process against a temporary
//! SQLite catalog.

mod common;

use axum::http::StatusCode;
use screenmatch_core::{Category, SeriesCatalog};

use common::{fixtures, TestConfig, TestFixture};

// =============================================================================
// Basic API Tests
// =============================================================================

#[tokio::test]
async fn test_welcome() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.text, "Bem-vindo ao Screenmatch!");
}

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_hides_api_key() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/config").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["omdb"]["api_key_configured"], true);
    assert!(!response.text.contains("test-omdb-key"));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new().await;
    fixture.seed_series("Breaking Bad", 9.5, Category::Crime);
    fixture.get("/series").await;

    let response = fixture.get("/metrics").await;
    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains("screenmatch_http_requests_total"));
    assert!(response.text.contains("screenmatch_catalog_series"));
    assert!(response.text.contains("screenmatch_catalog_queries_total"));
}

#[tokio::test]
async fn test_metrics_label_by_route_template() {
    let fixture = TestFixture::new().await;
    fixture.get("/series/category/unknown-genre-alpha").await;
    fixture.get("/series/category/unknown-genre-beta").await;
    fixture.get("/not-a-route-at-all").await;

    let response = fixture.get("/metrics").await;
    assert!(response.text.contains(r#"path="/series/category/{name}""#));
    assert!(response.text.contains(r#"path="unmatched""#));
    assert!(!response.text.contains("unknown-genre-alpha"));
    assert!(!response.text.contains("not-a-route-at-all"));
}

#[tokio::test]
async fn test_write_methods_not_allowed() {
    let fixture = TestFixture::new().await;
    let response = fixture.send("POST", "/series").await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);

    let response = fixture.send("DELETE", "/series/1").await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// Series
// =============================================================================

#[tokio::test]
async fn test_list_series_empty() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/series").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_series_without_episodes_embedded() {
    let fixture = TestFixture::new().await;
    let series = fixture.seed_series("Breaking Bad", 9.5, Category::Crime);
    fixture.seed_episodes(
        series.id,
        &[fixtures::new_episode(1, 1, "Pilot", 9.0, Some((2008, 1, 20)))],
    );

    let response = fixture.get("/series").await;
    assert_status!(response, StatusCode::OK);

    let list = response.body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "Breaking Bad");
    assert_eq!(list[0]["genre"], "CRIME");
    assert_eq!(list[0]["rating"], 9.5);
    assert!(list[0].get("episodes").is_none());
}

#[tokio::test]
async fn test_top5_series() {
    let fixture = TestFixture::new().await;
    for (i, rating) in [7.0, 9.1, 6.2, 8.4, 9.9, 5.5, 8.0].iter().enumerate() {
        fixture.seed_series(&format!("Series {}", i), *rating, Category::Drama);
    }

    let response = fixture.get("/series/top5").await;
    assert_status!(response, StatusCode::OK);

    let ratings: Vec<f64> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["rating"].as_f64().unwrap())
        .collect();
    assert_eq!(ratings, vec![9.9, 9.1, 8.4, 8.0, 7.0]);
}

#[tokio::test]
async fn test_releases_are_distinct_series() {
    let fixture = TestFixture::new().await;
    let a = fixture.seed_series("Series A", 8.0, Category::Drama);
    let b = fixture.seed_series("Series B", 8.0, Category::Drama);
    fixture.seed_episodes(
        a.id,
        &[
            fixtures::new_episode(1, 1, "A1", 8.0, Some((2024, 1, 1))),
            fixtures::new_episode(1, 2, "A2", 8.0, Some((2024, 1, 10))),
        ],
    );
    fixture.seed_episodes(
        b.id,
        &[fixtures::new_episode(1, 1, "B1", 8.0, Some((2024, 1, 5)))],
    );

    let response = fixture.get("/series/releases").await;
    assert_status!(response, StatusCode::OK);

    let titles: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Series A", "Series B"]);
}

#[tokio::test]
async fn test_get_series_by_id() {
    let fixture = TestFixture::new().await;
    let series = fixture.seed_series("Dark", 8.7, Category::ScienceFiction);

    let response = fixture.get(&format!("/series/{}", series.id)).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["id"], series.id);
    assert_eq!(response.body["title"], "Dark");
    assert_eq!(response.body["genre"], "SCIENCE_FICTION");
}

#[tokio::test]
async fn test_get_unknown_series_is_null() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/series/999").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.text, "null");
}

#[tokio::test]
async fn test_get_series_non_numeric_id() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/series/abc").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Seasons and episodes
// =============================================================================

#[tokio::test]
async fn test_all_episodes_lightweight_view() {
    let fixture = TestFixture::new().await;
    let series = fixture.seed_series("Lost", 8.3, Category::Adventure);
    fixture.seed_episodes(
        series.id,
        &[
            fixtures::new_episode(1, 1, "Pilot (Part 1)", 9.1, Some((2004, 9, 22))),
            fixtures::new_episode(1, 2, "Pilot (Part 2)", 9.0, Some((2004, 9, 29))),
            fixtures::new_episode(2, 1, "Man of Science, Man of Faith", 8.9, None),
        ],
    );

    let response = fixture
        .get(&format!("/series/{}/seasons/all", series.id))
        .await;
    assert_status!(response, StatusCode::OK);

    let episodes = response.body.as_array().unwrap();
    assert_eq!(episodes.len(), 3);
    assert_eq!(
        episodes[0],
        serde_json::json!({"season": 1, "number": 1, "title": "Pilot (Part 1)"})
    );
}

#[tokio::test]
async fn test_all_episodes_unknown_series_is_null() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/series/404/seasons/all").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.text, "null");
}

#[tokio::test]
async fn test_top_episodes() {
    let fixture = TestFixture::new().await;
    let series = fixture.seed_series("Breaking Bad", 9.5, Category::Crime);
    let other = fixture.seed_series("Friends", 8.9, Category::Comedy);
    let episodes: Vec<_> = (1..=7)
        .map(|n| fixtures::new_episode(1, n, &format!("Episode {}", n), n as f64, None))
        .collect();
    fixture.seed_episodes(series.id, &episodes);
    fixture.seed_episodes(
        other.id,
        &[fixtures::new_episode(1, 1, "The One Where", 10.0, None)],
    );

    let response = fixture
        .get(&format!("/series/{}/seasons/top", series.id))
        .await;
    assert_status!(response, StatusCode::OK);

    let titles: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec!["Episode 7", "Episode 6", "Episode 5", "Episode 4", "Episode 3"]
    );
}

#[tokio::test]
async fn test_top_episodes_unknown_series_is_null() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/series/404/seasons/top").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.text, "null");
}

#[tokio::test]
async fn test_single_season() {
    let fixture = TestFixture::new().await;
    let series = fixture.seed_series("Lost", 8.3, Category::Adventure);
    fixture.seed_episodes(
        series.id,
        &[
            fixtures::new_episode(1, 1, "S1E1", 9.1, None),
            fixtures::new_episode(2, 1, "S2E1", 8.9, None),
            fixtures::new_episode(2, 2, "S2E2", 8.1, None),
        ],
    );

    let response = fixture.get(&format!("/series/{}/seasons/2", series.id)).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 2);
    assert_eq!(response.body[0]["title"], "S2E1");
}

#[tokio::test]
async fn test_episode_title_search() {
    let fixture = TestFixture::new().await;
    let bb = fixture.seed_series("Breaking Bad", 9.5, Category::Crime);
    let lost = fixture.seed_series("Lost", 8.3, Category::Adventure);
    fixture.seed_episodes(
        bb.id,
        &[fixtures::new_episode(1, 1, "Pilot", 9.0, Some((2008, 1, 20)))],
    );
    fixture.seed_episodes(
        lost.id,
        &[fixtures::new_episode(1, 1, "Pilot (Part 1)", 9.1, None)],
    );

    let response = fixture.get("/episodes?title=pilot").await;
    assert_status!(response, StatusCode::OK);

    let episodes = response.body.as_array().unwrap();
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0]["series_id"], bb.id);
    assert_eq!(episodes[0]["release_date"], "2008-01-20");
    assert_eq!(episodes[0]["rating"], 9.0);
    assert!(episodes[1]["release_date"].is_null());
}

#[tokio::test]
async fn test_episode_search_requires_title() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/episodes").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn test_series_by_category_display_label() {
    let fixture = TestFixture::new().await;
    fixture.seed_series("Friends", 8.9, Category::Comedy);
    fixture.seed_series("Breaking Bad", 9.5, Category::Crime);

    // "Comédia", percent-encoded
    let response = fixture.get("/series/category/Com%C3%A9dia").await;
    assert_status!(response, StatusCode::OK);

    let list = response.body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "Friends");
}

#[tokio::test]
async fn test_series_by_category_source_label_any_case() {
    let fixture = TestFixture::new().await;
    fixture.seed_series("Dark", 8.7, Category::ScienceFiction);

    let response = fixture.get("/series/category/SCI-FI").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_series_by_unknown_category() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/series/category/faroeste").await;
    assert_status!(response, StatusCode::BAD_REQUEST);

    assert!(response.body["error"].as_str().unwrap().contains("faroeste"));
    let valid = response.body["valid_categories"].as_array().unwrap();
    assert_eq!(valid.len(), 12);
    assert!(valid.iter().any(|c| c == "Ficção Científica"));
}

// =============================================================================
// CORS
// =============================================================================

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let fixture = TestFixture::new().await;
    let response = fixture
        .get_with_origin("/series", "http://127.0.0.1:5501")
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(
        response.headers["access-control-allow-origin"],
        "http://127.0.0.1:5501"
    );
}

#[tokio::test]
async fn test_cors_ignores_other_origin() {
    let fixture = TestFixture::new().await;
    let response = fixture
        .get_with_origin("/series", "http://evil.example.com")
        .await;
    assert!(response.headers.get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_cors_any_origin() {
    let fixture = TestFixture::with_config(TestConfig::any_origin()).await;
    let response = fixture
        .get_with_origin("/series", "http://localhost:3000")
        .await;
    assert_eq!(response.headers["access-control-allow-origin"], "*");
}

// =============================================================================
// Store consistency through the API
// =============================================================================

#[tokio::test]
async fn test_replaced_episodes_visible_through_api() {
    let fixture = TestFixture::new().await;
    let series = fixture.seed_series("Dark", 8.7, Category::ScienceFiction);
    fixture.seed_episodes(
        series.id,
        &[
            fixtures::new_episode(1, 1, "Old 1", 7.0, None),
            fixtures::new_episode(1, 2, "Old 2", 7.0, None),
        ],
    );
    fixture.seed_episodes(series.id, &[fixtures::new_episode(1, 1, "Secrets", 8.5, None)]);

    let response = fixture
        .get(&format!("/series/{}/seasons/all", series.id))
        .await;
    let titles: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Secrets"]);
    assert_eq!(fixture.catalog.stats().unwrap().total_episodes, 1);
}
