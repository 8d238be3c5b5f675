//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use axum::{body::Body, extract::State, http::Request, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use worker_proxy::config::{ProxyConfig, SelectionMode, WorkerConfig};
use worker_proxy::load_balancer::WorkerRegistry;
use worker_proxy::{HttpServer, Shutdown};

/// Worker handler.
///
/// - `/echo` answers `name:<request body>`
/// - `/headers` answers `<x-request-id>|<x-forwarded-for>`
/// - anything else answers `name`
async fn worker_handler(State(name): State<&'static str>, request: Request<Body>) -> String {
    let path = request.uri().path().to_string();
    match path.as_str() {
        "/echo" => {
            let body = axum::body::to_bytes(request.into_body(), usize::MAX)
                .await
                .unwrap_or_default();
            format!("{}:{}", name, String::from_utf8_lossy(&body))
        }
        "/headers" => {
            let header = |key: &str| {
                request
                    .headers()
                    .get(key)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string()
            };
            format!("{}|{}", header("x-request-id"), header("x-forwarded-for"))
        }
        _ => name.to_string(),
    }
}

/// Start a named worker on an ephemeral port.
pub async fn start_worker(name: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    serve_worker(listener, name)
}

/// Start a named worker on a specific address.
pub async fn start_worker_at(addr: SocketAddr, name: &'static str) -> SocketAddr {
    let listener = TcpListener::bind(addr).await.unwrap();
    serve_worker(listener, name)
}

fn serve_worker(listener: TcpListener, name: &'static str) -> SocketAddr {
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(worker_handler).with_state(name);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// An address nothing listens on (connections are refused).
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

pub fn worker_url(addr: SocketAddr) -> String {
    format!("http://{}/", addr)
}

/// Proxy config over `workers` with health checks off.
pub fn config(mode: SelectionMode, workers: Vec<WorkerConfig>) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.selection.mode = mode;
    config.workers = workers;
    config.health_check.enabled = false;
    config.timeouts.connect_secs = 1;
    config.timeouts.request_secs = 5;
    config
}

pub struct RunningProxy {
    pub addr: SocketAddr,
    pub registry: Arc<WorkerRegistry>,
    pub shutdown: Shutdown,
}

impl RunningProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy(config: ProxyConfig) -> RunningProxy {
    let server = HttpServer::new(config).unwrap();
    let registry = server.registry().clone();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    RunningProxy {
        addr,
        registry,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// GET `path` and return (status, body).
pub async fn get(client: &reqwest::Client, proxy: &RunningProxy, path: &str) -> (u16, String) {
    let res = client.get(proxy.url(path)).send().await.expect("Proxy unreachable");
    let status = res.status().as_u16();
    (status, res.text().await.unwrap())
}
