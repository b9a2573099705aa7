//! Metrics collection and exposition.
//!
//! # Metrics
//! - `probe_health_checks_total` (counter): polls by outcome (`success` or error kind)
//! - `probe_health_check_duration_seconds` (histogram): request latency
//! - `probe_cluster_status` (gauge): 2=green, 1=yellow, 0=red, -1=unreachable
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Duration;

use ::metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::client::HealthStatus;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_health_check(outcome: &'static str) {
    counter!("probe_health_checks_total", "outcome" => outcome).increment(1);
}

pub fn record_check_duration(elapsed: Duration) {
    histogram!("probe_health_check_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_cluster_status(status: Option<HealthStatus>) {
    let value = status.map(|s| s.as_gauge()).unwrap_or(-1.0);
    gauge!("probe_cluster_status").set(value);
}
