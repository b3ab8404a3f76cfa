//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_forward_requests_total` (counter): forwarded requests by route, outcome
//! - `gateway_forward_duration_seconds` (histogram): downstream round-trip latency
//! - `gateway_forward_uploads_total` (counter): files forwarded by route
//! - `gateway_downstream_probe_total` (counter): status probes by result
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed, so tests need no setup
//! - Prometheus exposition on its own listener, off by default

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP scrape listener.
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished forwarding call.
pub fn record_forward(route: &'static str, outcome: &'static str, uploads: usize, start: Instant) {
    ::metrics::counter!("gateway_forward_requests_total", "route" => route, "outcome" => outcome).increment(1);
    ::metrics::counter!("gateway_forward_uploads_total", "route" => route).increment(uploads as u64);
    ::metrics::histogram!("gateway_forward_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record one status probe.
pub fn record_probe(online: bool) {
    let status = if online { "online" } else { "offline" };
    ::metrics::counter!("gateway_downstream_probe_total", "status" => status).increment(1);
}
