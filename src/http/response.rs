//! Response handling and transformation.
//!
//! # Responsibilities
//! - Hand the worker's response to the client without buffering
//! - Strip hop-by-hop headers from it
//! - Map dispatch failures to explicit statuses with fixed bodies

use axum::body::Body;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;
use hyper::body::Incoming;

use crate::dispatch::DispatchError;
use crate::http::request::strip_hop_by_hop;

/// Body sent when no worker could serve the request.
pub const UNAVAILABLE_BODY: &str = "no worker available";

/// Convert a worker response into a client response, streaming the body.
pub fn from_upstream(response: Response<Incoming>) -> Response<Body> {
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> axum::response::Response {
        match self {
            DispatchError::NoWorkerAvailable | DispatchError::Exhausted { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, UNAVAILABLE_BODY).into_response()
            }
            DispatchError::BodyTooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, "request body too large").into_response()
            }
            DispatchError::RequestBody(_) => {
                (StatusCode::BAD_REQUEST, "failed to read request body").into_response()
            }
        }
    }
}
