//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the worker proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Worker selection settings.
    pub selection: SelectionConfig,

    /// Ordered worker definitions. Order defines round-robin rotation.
    pub workers: Vec<WorkerConfig>,

    /// Health check settings.
    pub health_check: HealthCheckConfig,

    /// Timeouts applied when forwarding to a worker.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// How a worker is chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub enum SelectionMode {
    /// Cycle through workers in configuration order.
    #[default]
    #[serde(alias = "round_robin")]
    RoundRobin,
    /// Route exact paths to their assigned worker, round-robin otherwise.
    #[serde(alias = "path_prefix")]
    PathPrefix,
}

impl std::fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionMode::RoundRobin => write!(f, "RoundRobin"),
            SelectionMode::PathPrefix => write!(f, "PathPrefix"),
        }
    }
}

impl std::str::FromStr for SelectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RoundRobin" | "round_robin" | "round-robin" => Ok(SelectionMode::RoundRobin),
            "PathPrefix" | "path_prefix" | "path-prefix" => Ok(SelectionMode::PathPrefix),
            other => Err(format!("unknown selection mode: {}", other)),
        }
    }
}

/// Worker selection configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SelectionConfig {
    /// Selection mode.
    pub mode: SelectionMode,

    /// Advance the rotation cursor on path-affinity hits as well as on
    /// round-robin picks.
    pub advance_cursor_on_affinity: bool,
}

/// Backend worker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkerConfig {
    /// Worker base URL (e.g., "http://127.0.0.1:8081/").
    pub url: String,

    /// Exact request paths this worker serves in `PathPrefix` mode.
    #[serde(default)]
    pub paths: Vec<String>,
}

impl WorkerConfig {
    /// Worker without path affinity.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            paths: Vec::new(),
        }
    }

    /// Worker serving the given exact paths.
    pub fn with_paths<I, S>(url: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url: url.into(),
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Enable active health checks.
    pub enabled: bool,

    /// Health check interval in seconds.
    pub interval_secs: u64,

    /// TCP connect timeout for a single probe in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 10,
            connect_timeout_secs: 60,
        }
    }
}

/// Timeout configuration for forwarding.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed until the worker's response headers arrive, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes. Bodies are buffered for retries.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
