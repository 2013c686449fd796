//! Metrics collection and exposition.
//!
//! # Metrics
//! - `splendid_requests_total` (counter): requests by response status
//! - `splendid_request_duration_seconds` (histogram): handler latency
//! - `splendid_backend_logins_total` (counter): backend logins by result
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(status: u16, start_time: Instant) {
    metrics::counter!("splendid_requests_total", "status" => status.to_string()).increment(1);
    metrics::histogram!("splendid_request_duration_seconds")
        .record(start_time.elapsed().as_secs_f64());
}

pub fn record_backend_login(success: bool) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("splendid_backend_logins_total", "result" => result).increment(1);
}
