//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wallet_operations_total` (counter): facade calls by network, operation, outcome
//! - `wallet_operation_duration_seconds` (histogram): facade latency by network, operation
//! - `wallet_http_requests_total` (counter): gateway responses by route, status
//!
//! Label values are bounded: networks and operations are fixed sets, and
//! routes are the matched path templates.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatched wallet operation.
pub fn record_operation(network: &str, operation: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "wallet_operations_total",
        "network" => network.to_string(),
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);

    metrics::histogram!(
        "wallet_operation_duration_seconds",
        "network" => network.to_string(),
        "operation" => operation
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one gateway response.
pub fn record_request(route: &str, status: u16) {
    metrics::counter!(
        "wallet_http_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
