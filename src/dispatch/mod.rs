//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (headers prepared by http::request)
//!     → dispatcher.rs
//!         → SelectionStrategy (≤ worker_count attempts per selection)
//!         → forward.rs (Forward capability, hyper client in production)
//!         → on forward error: mark worker dead, select again
//!     → Forwarded { worker, response } | DispatchError
//! ```
//!
//! # Design Decisions
//! - At most worker_count forwards per inbound request
//! - Request bodies are buffered once so each attempt replays the same bytes
//! - A failed forward only ever moves a worker Alive → Dead

pub mod dispatcher;
pub mod forward;

pub use dispatcher::{DispatchError, Dispatcher, Forwarded};
pub use forward::{Forward, ForwardError, HyperForwarder};
