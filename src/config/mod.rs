//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + CLI overrides
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → WorkerRegistry / HttpServer built from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; worker membership is fixed for the process
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    HealthCheckConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, ProxyConfig,
    SelectionConfig, SelectionMode, TimeoutConfig, WorkerConfig,
};
pub use validation::{validate_config, ValidationError};
