//! Forwarding a request to a worker.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the worker's base URL
//! - Send it with connect and response-header timeouts
//! - Hand back the worker's response with hop-by-hop headers removed

use axum::body::Body;
use axum::http::{Request, Response, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time;
use url::{Position, Url};

use crate::config::TimeoutConfig;
use crate::http::response;

/// A forward that did not produce a worker response.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid upstream uri: {0}")]
    InvalidUri(String),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),
}

/// Sends a request to a worker's base URL.
pub trait Forward: Send + Sync + 'static {
    fn forward(
        &self,
        request: Request<Body>,
        target: &Url,
    ) -> impl Future<Output = Result<Response<Body>, ForwardError>> + Send;
}

/// Join the worker base URL with the inbound path and query.
///
/// `http://w:8081/api/` + `/orders?id=1` → `http://w:8081/api/orders?id=1`
pub fn upstream_uri(target: &Url, original: &Uri) -> Result<Uri, ForwardError> {
    let base_path = target.path().trim_end_matches('/');
    let path = original.path();

    let mut uri = String::with_capacity(target.as_str().len() + path.len());
    uri.push_str(&target[..Position::AfterPort]);
    uri.push_str(base_path);
    if !path.starts_with('/') {
        uri.push('/');
    }
    uri.push_str(path);

    match (target.query(), original.query()) {
        (Some(a), Some(b)) if !a.is_empty() => {
            uri.push('?');
            uri.push_str(a);
            uri.push('&');
            uri.push_str(b);
        }
        (Some(q), None) | (_, Some(q)) => {
            uri.push('?');
            uri.push_str(q);
        }
        (None, None) => {}
    }

    uri.parse::<Uri>()
        .map_err(|e| ForwardError::InvalidUri(format!("{}: {}", uri, e)))
}

/// Production forwarder on the hyper-util legacy client.
#[derive(Clone)]
pub struct HyperForwarder {
    client: Client<HttpConnector, Body>,
    request_timeout: Duration,
}

impl HyperForwarder {
    pub fn new(config: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        if config.connect_secs > 0 {
            connector.set_connect_timeout(Some(Duration::from_secs(config.connect_secs)));
        }

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            request_timeout: Duration::from_secs(config.request_secs),
        }
    }
}

impl Forward for HyperForwarder {
    async fn forward(&self, mut request: Request<Body>, target: &Url) -> Result<Response<Body>, ForwardError> {
        *request.uri_mut() = upstream_uri(target, request.uri())?;

        match time::timeout(self.request_timeout, self.client.request(request)).await {
            Ok(Ok(upstream)) => Ok(response::from_upstream(upstream)),
            Ok(Err(e)) => Err(ForwardError::Upstream(e)),
            Err(_) => Err(ForwardError::Timeout(self.request_timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(target: &str, original: &str) -> String {
        upstream_uri(&Url::parse(target).unwrap(), &original.parse().unwrap())
            .unwrap()
            .to_string()
    }

    #[test]
    fn joins_root_base() {
        assert_eq!(join("http://127.0.0.1:8081/", "/orders"), "http://127.0.0.1:8081/orders");
        assert_eq!(join("http://127.0.0.1:8081", "/"), "http://127.0.0.1:8081/");
    }

    #[test]
    fn joins_base_path_with_single_slash() {
        assert_eq!(join("http://worker:9000/api/", "/orders/1"), "http://worker:9000/api/orders/1");
        assert_eq!(join("http://worker:9000/api", "/"), "http://worker:9000/api/");
    }

    #[test]
    fn keeps_query() {
        assert_eq!(
            join("http://127.0.0.1:8081/", "/search?q=rust&page=2"),
            "http://127.0.0.1:8081/search?q=rust&page=2"
        );
        assert_eq!(
            join("http://127.0.0.1:8081/?tenant=a", "/search?q=rust"),
            "http://127.0.0.1:8081/search?tenant=a&q=rust"
        );
    }

    #[test]
    fn accepts_origin_form_and_absolute_inbound_uris() {
        assert_eq!(
            join("http://127.0.0.1:8081/", "http://proxy.local/x?y=1"),
            "http://127.0.0.1:8081/x?y=1"
        );
    }
}
