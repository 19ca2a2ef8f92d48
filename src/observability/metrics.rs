//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wish_requests_total` (counter): dispatched requests by member, status
//! - `wish_request_duration_seconds` (histogram): dispatch latency by member
//! - `wish_provider_failures_total` (counter): failed context provisioning
//! - `wish_routes_registered` (gauge): patterns registered at bootstrap

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Installs the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(member: &str, status: u16, start: Instant) {
    metrics::counter!(
        "wish_requests_total",
        "member" => member.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("wish_request_duration_seconds", "member" => member.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_provider_failure(member: &str) {
    metrics::counter!("wish_provider_failures_total", "member" => member.to_string()).increment(1);
}

pub fn record_routes(count: usize) {
    metrics::gauge!("wish_routes_registered").set(count as f64);
}
