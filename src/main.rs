//! Worker proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────────┐
//!                       │                   WORKER PROXY                    │
//!                       │                                                   │
//!     Client Request    │  ┌─────────┐    ┌────────────┐    ┌───────────┐  │
//!     ──────────────────┼─▶│  http   │───▶│ dispatcher │───▶│ selection │  │
//!                       │  │ server  │    │ (≤ N tries)│    │ strategy  │  │
//!                       │  └─────────┘    └─────┬──────┘    └─────┬─────┘  │
//!                       │                       │                 │        │
//!                       │                       ▼                 ▼        │
//!     Client Response   │               ┌──────────────┐   ┌───────────┐  │
//!     ◀─────────────────┼───────────────│   forward    │   │  worker   │  │
//!                       │               │ (hyper-util) │   │ registry  │  │
//!                       │               └──────┬───────┘   └─────▲─────┘  │
//!                       │                      │                 │        │
//!                       │                      ▼                 │        │
//!                       │                   Workers ◀──── health checker  │
//!                       └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;

use worker_proxy::lifecycle::{signals, startup, Shutdown};
use worker_proxy::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = startup::Cli::parse();

    // Configuration errors are fatal before anything starts.
    let config = startup::resolve_config(&cli)?;

    logging::init_logging(&config.observability);

    tracing::info!("worker-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        workers = config.workers.len(),
        mode = %config.selection.mode,
        health_interval_secs = config.health_check.interval_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    startup::run(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
