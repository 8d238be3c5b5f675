//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (axum::serve)
//!     → server.rs (router, middleware: request ID, trace, body limit)
//!     → request.rs (request ID, hop-by-hop stripping, X-Forwarded-For)
//!     → dispatch (select worker, forward, fail over)
//!     → response.rs (strip hop-by-hop, map dispatch errors to statuses)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::UNAVAILABLE_BODY;
pub use server::HttpServer;
