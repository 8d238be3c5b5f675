//! Worker registry.
//!
//! # Responsibilities
//! - Hold the ordered, fixed set of workers built from configuration
//! - Expose per-worker liveness reads and writes
//! - Carry the selection mode for the selectors

use std::sync::Arc;
use url::Url;

use crate::config::{ConfigError, ProxyConfig, SelectionMode, ValidationError};
use crate::load_balancer::worker::{Transition, Worker};

/// Ordered collection of workers shared by the dispatcher and the health checker.
#[derive(Debug)]
pub struct WorkerRegistry {
    workers: Vec<Arc<Worker>>,
    mode: SelectionMode,
}

impl WorkerRegistry {
    /// Create a registry from already-built workers. Order is preserved.
    pub fn new(workers: Vec<Worker>, mode: SelectionMode) -> Self {
        Self {
            workers: workers.into_iter().map(Arc::new).collect(),
            mode,
        }
    }

    /// Build the registry from configuration.
    ///
    /// A malformed worker URL or an empty worker list is a fatal configuration error.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ConfigError> {
        if config.workers.is_empty() {
            return Err(ConfigError::Validation(vec![ValidationError::NoWorkers]));
        }

        let mut workers = Vec::with_capacity(config.workers.len());
        let mut errors = Vec::new();
        for (index, worker) in config.workers.iter().enumerate() {
            match Url::parse(&worker.url) {
                Ok(url) => workers.push(Worker::with_paths(url, worker.paths.iter().cloned())),
                Err(e) => errors.push(ValidationError::MalformedUrl {
                    index,
                    url: worker.url.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }

        Ok(Self::new(workers, config.selection.mode))
    }

    /// All workers in rotation order.
    pub fn workers(&self) -> &[Arc<Worker>] {
        &self.workers
    }

    /// Snapshot of the workers currently alive, in rotation order.
    pub fn live_workers(&self) -> Vec<Arc<Worker>> {
        self.workers.iter().filter(|w| w.is_alive()).cloned().collect()
    }

    pub fn live_count(&self) -> usize {
        self.workers.iter().filter(|w| w.is_alive()).count()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    // Paired with `len` for clippy::len_without_is_empty.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn is_alive(&self, worker: &Worker) -> bool {
        worker.is_alive()
    }

    /// Authoritative liveness write (health checker).
    pub fn set_alive(&self, worker: &Worker, alive: bool) -> Transition {
        worker.set_alive(alive)
    }

    /// Pessimistic downgrade after a failed forward.
    pub fn mark_dead(&self, worker: &Worker) -> bool {
        worker.mark_dead()
    }
}
