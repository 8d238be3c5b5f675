//! Worker selection, forwarding and failover for one inbound request.

use axum::body::{Body, Bytes};
use axum::http::{request::Parts, Request, Response};
use http_body_util::LengthLimitError;
use std::sync::Arc;
use thiserror::Error;

use crate::dispatch::forward::Forward;
use crate::load_balancer::{Selection, SelectionStrategy, Worker, WorkerRegistry};
use crate::observability::metrics;

/// Terminal outcomes that did not produce a worker response.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Selection found no live worker.
    #[error("no worker available")]
    NoWorkerAvailable,

    /// Every allowed forward attempt failed.
    #[error("all {attempts} forward attempts failed")]
    Exhausted { attempts: usize },

    /// The body outgrew the configured limit while being read.
    #[error("request body exceeds the configured limit")]
    BodyTooLarge,

    #[error("failed to read request body: {0}")]
    RequestBody(#[source] axum::Error),
}

impl DispatchError {
    /// Classify a body read failure. The limit layer reports overflow of
    /// bodies without `Content-Length` as a nested `LengthLimitError`.
    fn from_body_error(err: axum::Error) -> Self {
        let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&err);
        while let Some(e) = source {
            if e.is::<LengthLimitError>() {
                return DispatchError::BodyTooLarge;
            }
            source = std::error::Error::source(e);
        }
        DispatchError::RequestBody(err)
    }
}

/// A successful dispatch.
#[derive(Debug)]
pub struct Forwarded {
    pub worker: Arc<Worker>,
    pub response: Response<Body>,
    /// Forward attempts used, including the successful one.
    pub attempts: usize,
}

pub struct Dispatcher<F> {
    strategy: SelectionStrategy,
    forwarder: F,
}

impl<F: Forward> Dispatcher<F> {
    pub fn new(strategy: SelectionStrategy, forwarder: F) -> Self {
        Self { strategy, forwarder }
    }

    pub fn registry(&self) -> &Arc<WorkerRegistry> {
        self.strategy.registry()
    }

    pub fn forwarder(&self) -> &F {
        &self.forwarder
    }

    /// Choose a live worker for `path`, re-asking the strategy on dead
    /// cursor positions at most `worker_count` times.
    pub fn select_target(&self, path: &str) -> Result<Arc<Worker>, DispatchError> {
        for _ in 0..self.registry().len() {
            match self.strategy.select(path) {
                Selection::Selected(worker) => return Ok(worker),
                Selection::Skipped => continue,
                Selection::Unavailable => break,
            }
        }
        Err(DispatchError::NoWorkerAvailable)
    }

    /// Forward `request` to a worker, failing over on forward errors.
    pub async fn dispatch(&self, request: Request<Body>) -> Result<Forwarded, DispatchError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(DispatchError::from_body_error)?;
        let path = parts.uri.path();

        let max_attempts = self.registry().len();
        for attempt in 1..=max_attempts {
            let worker = self.select_target(path)?;

            match self.forwarder.forward(replay(&parts, &body), worker.url()).await {
                Ok(response) => {
                    tracing::debug!(worker = %worker, attempt, status = %response.status(), "Forwarded");
                    return Ok(Forwarded {
                        worker,
                        response,
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        worker = %worker,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Forward failed, failing over"
                    );
                    if self.registry().mark_dead(&worker) {
                        tracing::warn!(worker = %worker, "Worker marked dead");
                        metrics::record_worker_liveness(worker.url().as_str(), false);
                    }
                    metrics::record_failover(worker.url().as_str());
                }
            }
        }

        Err(DispatchError::Exhausted {
            attempts: max_attempts,
        })
    }
}

/// Rebuild the inbound request for one attempt. Always HTTP/1.1 upstream.
fn replay(parts: &Parts, body: &Bytes) -> Request<Body> {
    let mut request = Request::new(Body::from(body.clone()));
    *request.method_mut() = parts.method.clone();
    *request.uri_mut() = parts.uri.clone();
    *request.headers_mut() = parts.headers.clone();
    request
}
