//! Common test utilities for E2E testing.
//!
//! This module provides a test fixture that creates an in-process server
//! backed by a temporary SQLite catalog, so the full router stack can be
//! exercised without binding a port.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use screenmatch_core::config::{CorsConfig, DatabaseConfig, ServerConfig};
use screenmatch_core::{
    Category, Config, Episode, NewEpisode, OmdbConfig, Series, SeriesCatalog,
    SqliteSeriesCatalog,
};

/// Re-export fixtures for test convenience
pub use screenmatch_core::testing::fixtures;

/// Test fixture for E2E testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_top_series() {
///     let fixture = TestFixture::new().await;
///     fixture.seed_series("Breaking Bad", 9.5, Category::Crime);
///
///     let response = fixture.get("/series/top5").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// The catalog behind the router, for seeding and assertions
    pub catalog: Arc<SqliteSeriesCatalog>,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body (`Null` when empty or not JSON)
    pub body: Value,
    /// Raw body text
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with default settings.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            omdb: Some(OmdbConfig::with_api_key("test-omdb-key")),
            translation: None,
            cors: CorsConfig {
                allowed_origins: test_config.allowed_origins,
            },
        };

        let catalog =
            Arc::new(SqliteSeriesCatalog::new(&db_path).expect("Failed to create catalog"));

        let state = Arc::new(screenmatch_server::state::AppState::new(
            config,
            Arc::clone(&catalog) as Arc<dyn SeriesCatalog>,
        ));

        let router = screenmatch_server::api::create_router(state);

        Self {
            router,
            catalog,
            temp_dir,
        }
    }

    // =========================================================================
    // Seeding
    // =========================================================================

    /// Store a series with fixture defaults.
    pub fn seed_series(&self, title: &str, rating: f64, genre: Category) -> Series {
        self.catalog
            .insert(&fixtures::new_series(title, rating, genre))
            .expect("Failed to seed series")
    }

    /// Replace the episodes of a stored series.
    pub fn seed_episodes(&self, series_id: i64, episodes: &[NewEpisode]) -> Vec<Episode> {
        self.catalog
            .replace_episodes(series_id, episodes)
            .expect("Failed to seed episodes")
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, &[]).await
    }

    /// Send a GET request with an `Origin` header.
    pub async fn get_with_origin(&self, path: &str, origin: &str) -> TestResponse {
        self.request("GET", path, &[("Origin", origin)]).await
    }

    /// Send a request with the given method (for testing unsupported verbs).
    pub async fn send(&self, method: &str, path: &str) -> TestResponse {
        self.request(method, path, &[]).await
    }

    async fn request(&self, method: &str, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            request_builder = request_builder.header(*name, *value);
        }

        let request = request_builder.body(Body::empty()).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://127.0.0.1:5501".to_string()],
        }
    }
}

impl TestConfig {
    /// Allow requests from any origin.
    pub fn any_origin() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
