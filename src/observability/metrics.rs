//! Metrics collection and exposition.
//!
//! # Metrics
//! - `resource_loads_total` (counter): loader invocations by resource, outcome
//!   (`found`, `missing`, `error`)
//! - `resource_routes_compiled` (gauge): routes in the last compiled router
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder it is a no-op
//! - Prometheus exposition runs on its own listener

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of one loader invocation.
pub fn record_load(resource: &str, outcome: &'static str) {
    metrics::counter!(
        "resource_loads_total",
        "resource" => resource.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record the size of a freshly compiled router.
pub fn record_routes_compiled(count: usize) {
    metrics::gauge!("resource_routes_compiled").set(count as f64);
}
