//! Prometheus metrics for request and store monitoring.
//!
//! This module provides metrics for:
//! - Item creation, completion updates, deletion
//! - Store query latency
//! - Transient store failures and retries

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use tracing::debug;

// === Metric Name Constants ===

/// Items created counter metric name.
pub const METRIC_ITEMS_CREATED: &str = "items_created_total";
/// Completion updates counter metric name.
pub const METRIC_COMPLETION_UPDATES: &str = "completion_updates_total";
/// Items deleted counter metric name.
pub const METRIC_ITEMS_DELETED: &str = "items_deleted_total";
/// Store retries counter metric name.
pub const METRIC_STORE_RETRIES: &str = "store_retries_total";
/// Store query latency metric name.
pub const METRIC_STORE_QUERY_LATENCY: &str = "store_query_latency_ms";
/// Upstream proxy failures counter metric name.
pub const METRIC_PROXY_UPSTREAM_FAILURES: &str = "proxy_upstream_failures_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_STORE_QUERY_LATENCY,
        "Store query latency in milliseconds"
    );

    describe_counter!(METRIC_ITEMS_CREATED, "Total number of items created");
    describe_counter!(
        METRIC_COMPLETION_UPDATES,
        "Total number of completion flag updates"
    );
    describe_counter!(METRIC_ITEMS_DELETED, "Total number of items deleted");
    describe_counter!(
        METRIC_STORE_RETRIES,
        "Total number of retried transient store failures"
    );
    describe_counter!(
        METRIC_PROXY_UPSTREAM_FAILURES,
        "Total number of failed upstream status calls"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus exporter on its own listener.
pub fn install_exporter(port: u16) -> Result<(), BuildError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new().with_http_listener(addr).install()
}

/// Increment items created counter.
pub fn inc_items_created() {
    counter!(METRIC_ITEMS_CREATED).increment(1);
}

/// Increment completion updates counter.
pub fn inc_completion_updates() {
    counter!(METRIC_COMPLETION_UPDATES).increment(1);
}

/// Increment items deleted counter.
pub fn inc_items_deleted() {
    counter!(METRIC_ITEMS_DELETED).increment(1);
}

/// Increment store retries counter.
pub fn inc_store_retries() {
    counter!(METRIC_STORE_RETRIES).increment(1);
}

/// Increment upstream proxy failures counter.
pub fn inc_proxy_upstream_failures() {
    counter!(METRIC_PROXY_UPSTREAM_FAILURES).increment(1);
}

/// Record store query latency.
pub fn record_store_query_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_STORE_QUERY_LATENCY).record(latency_ms);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(self.metric_name).record(latency_ms);
    }
}

/// Create a latency timer for store queries.
pub fn timer_store_query() -> LatencyTimer {
    LatencyTimer::new(METRIC_STORE_QUERY_LATENCY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn latency_timer_measures_time() {
        let timer = LatencyTimer::new("test_metric");
        sleep(Duration::from_millis(10));
        let elapsed = timer.elapsed_ms();
        assert!(elapsed >= 9.0); // Allow some tolerance
        // Timer will record on drop
    }
}
