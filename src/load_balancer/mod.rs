//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → SelectionStrategy (mode from registry)
//!         - path_affinity.rs (exact path → assigned live worker)
//!         - round_robin.rs (rotate through workers via shared cursor)
//!     → registry.rs (ordered workers + liveness)
//!     → Selected | Skipped | Unavailable
//! ```
//!
//! # Design Decisions
//! - Selection is synchronous and lock-free; no I/O under the cursor
//! - One call is one attempt; retrying on `Skipped` is the caller's job
//! - Dead workers are never returned

pub mod path_affinity;
pub mod registry;
pub mod round_robin;
pub mod worker;

use std::sync::Arc;

use crate::config::{SelectionConfig, SelectionMode};
use path_affinity::PathAffinity;
use round_robin::RoundRobin;

pub use registry::WorkerRegistry;
pub use worker::{Liveness, Transition, Worker};

/// Result of one selection attempt.
#[derive(Debug, Clone)]
pub enum Selection {
    /// A live worker to forward to.
    Selected(Arc<Worker>),
    /// The cursor pointed at a dead worker; ask again.
    Skipped,
    /// No worker is alive.
    Unavailable,
}

impl Selection {
    pub fn worker(&self) -> Option<&Arc<Worker>> {
        match self {
            Selection::Selected(w) => Some(w),
            _ => None,
        }
    }
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Selection::Selected(a), Selection::Selected(b)) => Arc::ptr_eq(a, b),
            (Selection::Skipped, Selection::Skipped) => true,
            (Selection::Unavailable, Selection::Unavailable) => true,
            _ => false,
        }
    }
}

/// A worker selection algorithm.
pub trait Selector: Send + Sync + std::fmt::Debug {
    /// Make one selection attempt for `path` over `workers` (rotation order).
    fn select(&self, path: &str, workers: &[Arc<Worker>]) -> Selection;
}

/// Binds a selector to the shared registry.
#[derive(Debug)]
pub struct SelectionStrategy {
    registry: Arc<WorkerRegistry>,
    selector: Box<dyn Selector>,
}

impl SelectionStrategy {
    /// Pick the selector matching the registry's mode.
    pub fn new(registry: Arc<WorkerRegistry>, config: &SelectionConfig) -> Self {
        let selector: Box<dyn Selector> = match registry.mode() {
            SelectionMode::RoundRobin => Box::new(RoundRobin::new()),
            SelectionMode::PathPrefix => Box::new(PathAffinity::new(config.advance_cursor_on_affinity)),
        };
        Self { registry, selector }
    }

    pub fn registry(&self) -> &Arc<WorkerRegistry> {
        &self.registry
    }

    /// One selection attempt for `path`.
    pub fn select(&self, path: &str) -> Selection {
        self.selector.select(path, self.registry.workers())
    }
}
