//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Catalog queries against the series store
//! - Ingestion runs (series and episode imports)
//! - External services (OMDb, MyMemory)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Catalog Metrics
// =============================================================================

/// Catalog store operations by query name.
pub static CATALOG_QUERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "screenmatch_catalog_queries_total",
            "Total catalog store operations",
        ),
        &["query"], // "top_rated", "latest_releases", ...
    )
    .unwrap()
});

// =============================================================================
// Ingestion Metrics
// =============================================================================

/// Ingestion runs by kind and result.
pub static INGESTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("screenmatch_ingestions_total", "Total ingestion runs"),
        &["kind", "result"], // kind: "series", "episodes"; result: "success", "failed"
    )
    .unwrap()
});

/// Episodes written per episode ingestion.
pub static EPISODES_INGESTED: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "screenmatch_episodes_ingested",
            "Number of episodes stored per episode ingestion",
        )
        .buckets(vec![1.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0]),
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service request duration.
pub static EXTERNAL_SERVICE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "screenmatch_external_service_duration_seconds",
            "Duration of external service calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["service", "operation"],
    )
    .unwrap()
});

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "screenmatch_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Catalog
        Box::new(CATALOG_QUERIES.clone()),
        // Ingestion
        Box::new(INGESTIONS_TOTAL.clone()),
        Box::new(EPISODES_INGESTED.clone()),
        // External services
        Box::new(EXTERNAL_SERVICE_DURATION.clone()),
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
    ]
}
