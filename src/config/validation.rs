//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate worker URLs and affinity paths
//! - Validate value ranges (intervals and timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no workers configured")]
    NoWorkers,

    #[error("worker {index}: malformed url {url:?}: {reason}")]
    MalformedUrl {
        index: usize,
        url: String,
        reason: String,
    },

    #[error("worker {index}: unsupported scheme {scheme:?} (only http is supported)")]
    UnsupportedScheme { index: usize, scheme: String },

    #[error("worker {index}: url {url:?} has no host")]
    MissingHost { index: usize, url: String },

    #[error("worker {index}: affinity path {path:?} must start with '/'")]
    InvalidPath { index: usize, path: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.workers.is_empty() {
        errors.push(ValidationError::NoWorkers);
    }

    for (index, worker) in config.workers.iter().enumerate() {
        match Url::parse(&worker.url) {
            Ok(url) => {
                if url.scheme() != "http" {
                    errors.push(ValidationError::UnsupportedScheme {
                        index,
                        scheme: url.scheme().to_string(),
                    });
                }
                if url.host_str().is_none() {
                    errors.push(ValidationError::MissingHost {
                        index,
                        url: worker.url.clone(),
                    });
                }
            }
            Err(e) => errors.push(ValidationError::MalformedUrl {
                index,
                url: worker.url.clone(),
                reason: e.to_string(),
            }),
        }

        for path in &worker.paths {
            if !path.starts_with('/') {
                errors.push(ValidationError::InvalidPath {
                    index,
                    path: path.clone(),
                });
            }
        }
    }

    if config.health_check.interval_secs == 0 {
        errors.push(ValidationError::Zero { field: "health_check.interval_secs" });
    }
    if config.health_check.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "health_check.connect_timeout_secs" });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.request_secs" });
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero { field: "limits.max_body_bytes" });
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::WorkerConfig;

    fn config_with(workers: Vec<WorkerConfig>) -> ProxyConfig {
        ProxyConfig {
            workers,
            ..ProxyConfig::default()
        }
    }

    #[test]
    fn accepts_minimal_config() {
        let config = config_with(vec![WorkerConfig::new("http://127.0.0.1:8081/")]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_empty_worker_list() {
        let errors = validate_config(&ProxyConfig::default()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::NoWorkers]);
    }

    #[test]
    fn collects_every_error() {
        let mut config = config_with(vec![
            WorkerConfig::new("not a url"),
            WorkerConfig::new("https://secure.local/"),
            WorkerConfig::with_paths("http://127.0.0.1:8082", ["orders"]),
        ]);
        config.health_check.interval_secs = 0;
        config.listener.bind_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::MalformedUrl { index: 0, .. }));
        assert!(errors.contains(&ValidationError::UnsupportedScheme {
            index: 1,
            scheme: "https".into()
        }));
        assert!(errors.contains(&ValidationError::InvalidPath {
            index: 2,
            path: "orders".into()
        }));
        assert!(errors.contains(&ValidationError::Zero {
            field: "health_check.interval_secs"
        }));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidAddress { field: "listener.bind_address", .. })));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn metrics_address_only_checked_when_enabled() {
        let mut config = config_with(vec![WorkerConfig::new("http://127.0.0.1:8081/")]);
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
