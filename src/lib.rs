//! HTTP proxy that spreads requests over a fixed pool of workers.
//!
//! Workers are chosen round-robin, or by exact-path affinity with a
//! round-robin fallback. A background health checker probes every worker and
//! failed forwards fail over to the next live worker.

pub mod config;
pub mod dispatch;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
