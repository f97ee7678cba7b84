//! Prometheus metrics for request latency and store activity.
//!
//! This module provides metrics for:
//! - HTTP handler latency, labelled by endpoint
//! - People created, deleted and rejected
//! - Number of stored people
//! - Health check failures, labelled by probe and check

use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// People created counter metric name.
pub const METRIC_PEOPLE_CREATED: &str = "people_created_total";
/// People deleted counter metric name.
pub const METRIC_PEOPLE_DELETED: &str = "people_deleted_total";
/// Rejected create requests counter metric name.
pub const METRIC_PEOPLE_CREATE_REJECTED: &str = "people_create_rejected_total";
/// Stored people gauge metric name.
pub const METRIC_PEOPLE_STORED: &str = "people_stored";
/// Health check failures counter metric name.
pub const METRIC_HEALTH_CHECK_FAILURES: &str = "health_check_failures_total";

/// Install the global Prometheus recorder and return its render handle.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP handler latency in milliseconds"
    );

    describe_counter!(METRIC_PEOPLE_CREATED, "Total number of people created");
    describe_counter!(METRIC_PEOPLE_DELETED, "Total number of people deleted");
    describe_counter!(
        METRIC_PEOPLE_CREATE_REJECTED,
        "Total number of create requests rejected"
    );
    describe_counter!(
        METRIC_HEALTH_CHECK_FAILURES,
        "Total number of failed health checks"
    );

    describe_gauge!(METRIC_PEOPLE_STORED, "Number of people currently stored");

    debug!("Metrics initialized");
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, endpoint: &'static str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint).record(latency_ms);
}

/// Increment people created counter.
pub fn inc_people_created() {
    counter!(METRIC_PEOPLE_CREATED).increment(1);
}

/// Increment people deleted counter.
pub fn inc_people_deleted() {
    counter!(METRIC_PEOPLE_DELETED).increment(1);
}

/// Increment rejected create counter.
pub fn inc_people_create_rejected(reason: &'static str) {
    counter!(METRIC_PEOPLE_CREATE_REJECTED, "reason" => reason).increment(1);
}

/// Set the stored people gauge.
pub fn set_people_stored(count: usize) {
    gauge!(METRIC_PEOPLE_STORED).set(count as f64);
}

/// Increment health check failure counter.
pub fn inc_health_check_failures(probe: &str, check: &str) {
    counter!(
        METRIC_HEALTH_CHECK_FAILURES,
        "probe" => probe.to_string(),
        "check" => check.to_string()
    )
    .increment(1);
}

/// RAII guard for timing HTTP handlers.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    endpoint: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given endpoint.
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            start: Instant::now(),
            endpoint,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_http_latency(self.start, self.endpoint);
    }
}
