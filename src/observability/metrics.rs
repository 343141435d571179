//! Metrics collection and exposition.
//!
//! # Metrics
//! - `pricing_fetch_total` (counter): configuration reads by outcome
//! - `pricing_save_total` (counter): partial updates by outcome
//! - `pricing_stale_responses_total` (counter): fetch responses discarded
//!   because a newer selection superseded them
//! - `pricing_api_request_duration_seconds` (histogram): backend latency by endpoint
//!
//! Without an installed recorder every call is a no-op.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Install the Prometheus exporter with an HTTP scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_fetch(outcome: &'static str) {
    counter!("pricing_fetch_total", "outcome" => outcome).increment(1);
}

pub fn record_save(outcome: &'static str) {
    counter!("pricing_save_total", "outcome" => outcome).increment(1);
}

pub fn record_stale_response() {
    counter!("pricing_stale_responses_total").increment(1);
}

pub fn record_request_duration(endpoint: &'static str, elapsed: Duration) {
    histogram!("pricing_api_request_duration_seconds", "endpoint" => endpoint)
        .record(elapsed.as_secs_f64());
}
