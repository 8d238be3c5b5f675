//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, worker
//! - `proxy_request_duration_seconds` (histogram): end-to-end latency
//! - `proxy_worker_alive` (gauge): 1=alive, 0=dead, per worker
//! - `proxy_failovers_total` (counter): failed forwards per worker

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed request. `worker` is "none" when nothing was forwarded.
pub fn record_request(method: &str, status: u16, worker: &str, start: Instant) {
    counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "worker" => worker.to_string()
    )
    .increment(1);

    histogram!("proxy_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_worker_liveness(worker: &str, alive: bool) {
    gauge!("proxy_worker_alive", "worker" => worker.to_string()).set(if alive { 1.0 } else { 0.0 });
}

pub fn record_failover(worker: &str) {
    counter!("proxy_failovers_total", "worker" => worker.to_string()).increment(1);
}
