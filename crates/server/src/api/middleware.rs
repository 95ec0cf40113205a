//! Metrics middleware for API routes.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Method, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::metrics::{HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION};

/// Path label for requests that matched no route.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Metrics middleware that tracks HTTP request duration and counts.
///
/// This middleware records:
/// - Request duration (histogram)
/// - Request count (counter)
/// - Requests in flight (gauge)
///
/// Requests are labelled by route template (`/series/{id}`), never by the raw
/// URI, so the label set stays bounded by the router.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = method_label(request.method());
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    HTTP_REQUESTS_IN_FLIGHT.inc();

    let response = next.run(request).await;

    HTTP_REQUESTS_IN_FLIGHT.dec();

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUEST_DURATION
        .with_label_values(&[method, &route, &status])
        .observe(duration);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, &route, &status])
        .inc();

    response
}

/// Extension methods all share one label.
fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::HEAD => "HEAD",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::OPTIONS => "OPTIONS",
        Method::CONNECT => "CONNECT",
        Method::TRACE => "TRACE",
        _ => "OTHER",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, middleware, routing::get, Router};
    use prometheus::core::Collector;
    use tower::ServiceExt;

    async fn dummy_handler() -> &'static str {
        "OK"
    }

    fn app() -> Router {
        Router::new()
            .route("/items/{id}", get(dummy_handler))
            .route("/items/kind/{name}", get(dummy_handler))
            .layer(middleware::from_fn(metrics_middleware))
    }

    async fn call(app: &Router, method: &str, uri: &str) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.clone().oneshot(request).await.unwrap().status()
    }

    fn requests_total(method: &str, route: &str, status: &str) -> u64 {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&[method, route, status])
            .get()
    }

    /// Every path label currently recorded by the request counter.
    fn recorded_paths() -> Vec<String> {
        HTTP_REQUESTS_TOTAL
            .collect()
            .iter()
            .flat_map(|family| family.get_metric().to_vec())
            .flat_map(|metric| {
                metric
                    .get_label()
                    .iter()
                    .filter(|pair| pair.get_name() == "path")
                    .map(|pair| pair.get_value().to_string())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_metrics_middleware_labels_by_route_template() {
        let app = app();
        let before = requests_total("GET", "/items/{id}", "200");

        assert_eq!(call(&app, "GET", "/items/987654").await, StatusCode::OK);
        assert_eq!(call(&app, "GET", "/items/abc").await, StatusCode::OK);

        assert_eq!(requests_total("GET", "/items/{id}", "200"), before + 2);
    }

    #[tokio::test]
    async fn test_distinct_path_parameters_share_one_label() {
        let app = app();
        let before = requests_total("GET", "/items/kind/{name}", "200");

        call(&app, "GET", "/items/kind/bogus-one").await;
        call(&app, "GET", "/items/kind/bogus-two").await;

        assert_eq!(requests_total("GET", "/items/kind/{name}", "200"), before + 2);
        assert!(!recorded_paths().iter().any(|p| p.contains("bogus")));
    }

    #[tokio::test]
    async fn test_unmatched_requests_share_one_label() {
        let app = app();
        let before = requests_total("GET", UNMATCHED_ROUTE, "404");

        for i in 0..20 {
            let status = call(&app, "GET", &format!("/no-such-route-{}", i)).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }

        assert_eq!(requests_total("GET", UNMATCHED_ROUTE, "404"), before + 20);
        assert!(!recorded_paths().iter().any(|p| p.starts_with("/no-such-route")));
    }

    #[test]
    fn test_method_label_collapses_extension_methods() {
        assert_eq!(method_label(&Method::GET), "GET");
        let custom = Method::from_bytes(b"FROBNICATE").unwrap();
        assert_eq!(method_label(&custom), "OTHER");
    }
}
