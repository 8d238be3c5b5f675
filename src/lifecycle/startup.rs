//! Startup orchestration.
//!
//! # Responsibilities
//! - Merge the config file with command-line overrides and validate
//! - Start the metrics exporter when enabled
//! - Build the server, bind the listener, serve until shutdown

use clap::Parser;
use std::net::AddrParseError;
use std::path::PathBuf;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{parse_config, validate_config, ConfigError, ProxyConfig, SelectionMode, WorkerConfig};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::metrics;

/// Command-line interface.
#[derive(Debug, Default, Parser)]
#[command(name = "worker-proxy")]
#[command(about = "Round-robin / path-affinity HTTP proxy with health-checked workers", long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:8080.
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Worker base URL; repeat for several. Replaces the file's worker list.
    #[arg(short, long = "worker")]
    pub workers: Vec<String>,

    /// Selection mode: RoundRobin or PathPrefix.
    #[arg(short, long)]
    pub mode: Option<SelectionMode>,
}

/// Fatal errors before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the effective configuration: file (if any), then CLI overrides, then validation.
pub fn resolve_config(cli: &Cli) -> Result<ProxyConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => parse_config(&std::fs::read_to_string(path)?)?,
        None => ProxyConfig::default(),
    };

    if let Some(listen) = &cli.listen {
        config.listener.bind_address = listen.clone();
    }
    if !cli.workers.is_empty() {
        config.workers = cli.workers.iter().map(WorkerConfig::new).collect();
    }
    if let Some(mode) = cli.mode {
        config.selection.mode = mode;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Serve `config` until `shutdown` is triggered.
pub async fn run(config: ProxyConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let server = HttpServer::new(config)?;
    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;

    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
