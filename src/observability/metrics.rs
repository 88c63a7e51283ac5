//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by connector, status
//! - `gateway_request_duration_seconds` (histogram): latency by connector
//! - `gateway_not_found_total` (counter): requests no context claimed
//! - `gateway_scheme_redirects_total` (counter): plaintext requests redirected
//! - `gateway_scheme_forbidden_total` (counter): plaintext requests refused
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter is optional and serves its own HTTP endpoint

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record a completed request.
pub fn record_request(connector: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "connector" => connector.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "connector" => connector.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a request nothing claimed.
pub fn record_not_found(connector: &str) {
    metrics::counter!("gateway_not_found_total", "connector" => connector.to_string()).increment(1);
}
