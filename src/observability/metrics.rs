//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): inbound requests by route, status
//! - `relay_request_duration_seconds` (histogram): inbound latency by route
//! - `relay_upstream_calls_total` (counter): upstream calls by outcome
//! - `relay_upstream_duration_seconds` (histogram): upstream latency by outcome

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one inbound request.
pub fn record_request(route: &'static str, status: u16, started: Instant) {
    metrics::counter!("relay_requests_total", "route" => route, "status" => status.to_string())
        .increment(1);
    metrics::histogram!("relay_request_duration_seconds", "route" => route)
        .record(started.elapsed().as_secs_f64());
}

/// Record one upstream call by outcome label.
pub fn record_upstream_call(outcome: &'static str, started: Instant) {
    metrics::counter!("relay_upstream_calls_total", "outcome" => outcome).increment(1);
    metrics::histogram!("relay_upstream_duration_seconds", "outcome" => outcome)
        .record(started.elapsed().as_secs_f64());
}
