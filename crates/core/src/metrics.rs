//! Prometheus metrics for core components.
//!
//! Covers external catalog searches and shelf mutations. The server
//! registers these alongside its HTTP metrics.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// External Catalog Metrics
// =============================================================================

/// Catalog searches by provider and result.
pub static SEARCH_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "myshelf_search_requests_total",
            "Total external catalog searches",
        ),
        &["provider", "result"], // result: "success", "error", "timeout", "stale"
    )
    .unwrap()
});

/// Catalog search duration in seconds.
pub static SEARCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "myshelf_search_duration_seconds",
            "Duration of external catalog searches",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["provider"],
    )
    .unwrap()
});

/// Hits returned per search.
pub static SEARCH_RESULTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "myshelf_search_results",
            "Number of hits returned per catalog search",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 20.0, 50.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Shelf Metrics
// =============================================================================

/// Committed shelf mutations by operation.
pub static LIBRARY_MUTATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "myshelf_library_mutations_total",
            "Total committed shelf mutations",
        ),
        &["operation"],
    )
    .unwrap()
});

/// Add attempts rejected as duplicates.
pub static DUPLICATE_ADDS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "myshelf_duplicate_adds_total",
        "Add attempts ignored because the work was already on the shelf",
    )
    .unwrap()
});

/// Failed writes to the key-value store.
pub static STORAGE_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "myshelf_storage_failures_total",
        "Writes to the key-value store that failed",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // External catalog
        Box::new(SEARCH_REQUESTS.clone()),
        Box::new(SEARCH_DURATION.clone()),
        Box::new(SEARCH_RESULTS.clone()),
        // Shelf
        Box::new(LIBRARY_MUTATIONS.clone()),
        Box::new(DUPLICATE_ADDS.clone()),
        Box::new(STORAGE_FAILURES.clone()),
    ]
}
