//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router accepting every method and path
//! - Wire up middleware (request ID, tracing, body limit)
//! - Build the worker registry, selection strategy and dispatcher
//! - Spawn the health checker alongside the server
//! - Serve until the shutdown signal, then drain

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::config::{ConfigError, ProxyConfig};
use crate::dispatch::{Dispatcher, HyperForwarder};
use crate::health::HealthChecker;
use crate::http::request::{self, X_REQUEST_ID};
use crate::load_balancer::{SelectionStrategy, WorkerRegistry};
use crate::observability::{metrics, tracing::request_span};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher<HyperForwarder>>,
}

/// HTTP server for the worker proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    registry: Arc<WorkerRegistry>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails if the worker list cannot be turned into a registry.
    pub fn new(config: ProxyConfig) -> Result<Self, ConfigError> {
        let registry = Arc::new(WorkerRegistry::from_config(&config)?);
        let strategy = SelectionStrategy::new(registry.clone(), &config.selection);
        let forwarder = HyperForwarder::new(&config.timeouts);

        let state = AppState {
            dispatcher: Arc::new(Dispatcher::new(strategy, forwarder)),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            registry,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(request::set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>))
                    .layer(request::propagate_request_id_layer())
                    .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes)),
            )
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            workers = self.registry.len(),
            mode = %self.registry.mode(),
            "HTTP server starting"
        );

        let health = if self.config.health_check.enabled {
            let checker = HealthChecker::new(self.registry.clone(), &self.config.health_check);
            Some(checker.spawn(shutdown.resubscribe()))
        } else {
            tracing::info!("Active health checks disabled");
            None
        };

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        if let Some(handle) = health {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Health checker task failed");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Shared worker registry (for inspection and tests).
    pub fn registry(&self) -> &Arc<WorkerRegistry> {
        &self.registry
    }
}

/// Main proxy handler.
/// Selects a worker and forwards the request, failing over on errors.
async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    mut request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    request::prepare_upstream(request.headers_mut(), peer.ip());

    match state.dispatcher.dispatch(request).await {
        Ok(forwarded) => {
            metrics::record_request(
                &method,
                forwarded.response.status().as_u16(),
                forwarded.worker.url().as_str(),
                start_time,
            );
            forwarded.response
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Request not served");
            let response = e.into_response();
            metrics::record_request(&method, response.status().as_u16(), "none", start_time);
            response
        }
    }
}
