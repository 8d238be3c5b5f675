//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active probes (checker.rs):
//!     Periodic timer
//!     → probe.rs (TCP connect to every worker, concurrently)
//!     → WorkerRegistry::set_alive
//!
//! Failover (dispatch):
//!     Forward error observed
//!     → WorkerRegistry::mark_dead (Alive → Dead only)
//! ```
//!
//! # Design Decisions
//! - Workers start Alive; the first probe runs one interval after startup
//! - Only the checker revives a worker
//! - Probe failures are logged and recorded, never surfaced to requests

pub mod checker;
pub mod probe;

pub use checker::HealthChecker;
pub use probe::{probe, ProbeError};
