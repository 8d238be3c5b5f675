//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe every worker
//! - Write liveness into the registry and log each transition
//! - Stop promptly on shutdown, abandoning in-flight probes

use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::HealthCheckConfig;
use crate::health::probe::{probe, ProbeError};
use crate::load_balancer::{Worker, WorkerRegistry};
use crate::observability::metrics;

pub struct HealthChecker {
    registry: Arc<WorkerRegistry>,
    interval: Duration,
    connect_timeout: Duration,
}

impl HealthChecker {
    pub fn new(registry: Arc<WorkerRegistry>, config: &HealthCheckConfig) -> Self {
        Self::with_timing(
            registry,
            Duration::from_secs(config.interval_secs),
            Duration::from_secs(config.connect_timeout_secs),
        )
    }

    /// Checker with explicit (sub-second capable) timings.
    pub fn with_timing(registry: Arc<WorkerRegistry>, interval: Duration, connect_timeout: Duration) -> Self {
        Self {
            registry,
            interval,
            connect_timeout,
        }
    }

    /// Start the checker task.
    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Probe loop. Returns when the shutdown signal fires (or its sender is gone).
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval = ?self.interval,
            connect_timeout = ?self.connect_timeout,
            workers = self.registry.len(),
            "Health checker starting"
        );

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Health checker received shutdown signal, exiting loop");
                    break;
                }
                _ = async {
                    ticker.tick().await;
                    self.check_all().await;
                } => {}
            }
        }
    }

    /// Probe every worker once, concurrently, and apply the results.
    pub async fn check_all(&self) {
        let timeout = self.connect_timeout;
        let probes = self.registry.workers().iter().map(|worker| async move {
            let result = probe(worker.url(), timeout).await;
            (worker, result)
        });

        for (worker, result) in join_all(probes).await {
            self.apply(worker, result);
        }
    }

    fn apply(&self, worker: &Worker, result: Result<(), ProbeError>) {
        let alive = match result {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(worker = %worker, error = %e, "Cannot reach worker");
                false
            }
        };

        let transition = self.registry.set_alive(worker, alive);
        if transition.changed() {
            if alive {
                tracing::info!(worker = %worker, state = %transition.to, "Worker recovered");
            } else {
                tracing::warn!(worker = %worker, state = %transition.to, "Worker is unreachable");
            }
        } else {
            tracing::debug!(worker = %worker, state = %transition.to, "Worker state unchanged");
        }

        metrics::record_worker_liveness(worker.url().as_str(), alive);
    }
}
