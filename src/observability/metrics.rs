//! Metrics collection and exposition.
//!
//! # Metrics
//! - `forwarder_requests_total` (counter): forwards by outcome
//! - `forwarder_request_duration_seconds` (histogram): forward latency by outcome
//! - `forwarder_upstream_status_total` (counter): relayed upstream status codes

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a finished forward.
pub fn record_forward(outcome: &'static str, start_time: Instant) {
    metrics::counter!("forwarder_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("forwarder_request_duration_seconds", "outcome" => outcome)
        .record(start_time.elapsed().as_secs_f64());
}

/// Record the status code an upstream answered with.
pub fn record_upstream_status(status: u16) {
    metrics::counter!("forwarder_upstream_status_total", "status" => status.to_string()).increment(1);
}
