//! HTTP routes
//!
//! Thin transport boundary: handlers parse the request shape, call the
//! store service, and translate results and errors to JSON responses.

pub mod health;
pub mod stores;

pub use health::{health_check, version_info};

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use tracing::error;

use crate::types::SignpostError;

/// API error response body
#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
    code: &'static str,
}

/// Build a JSON error response
pub(crate) fn error_response(
    status: StatusCode,
    message: &str,
    code: &'static str,
) -> Response<Full<Bytes>> {
    let error = ApiError {
        error: message.to_string(),
        code,
    };
    let body = serde_json::to_vec(&error).unwrap_or_default();

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| {
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Full::new(Bytes::from(r#"{"error":"Internal error"}"#)))
                .unwrap()
        })
}

/// Build a successful JSON response
pub(crate) fn json_response<T: Serialize>(data: &T) -> Response<Full<Bytes>> {
    let body = serde_json::to_vec(data).unwrap_or_default();

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| {
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Full::new(Bytes::from(r#"{"error":"Internal error"}"#)))
                .unwrap()
        })
}

/// Map a service error to an HTTP response
pub(crate) fn error_from(err: &SignpostError) -> Response<Full<Bytes>> {
    let (status, code) = match err {
        SignpostError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        SignpostError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
        SignpostError::InvalidFilter(_) => (StatusCode::BAD_REQUEST, "INVALID_FILTER"),
        SignpostError::PreconditionFailed(_) => (StatusCode::CONFLICT, "PRECONDITION_FAILED"),
        SignpostError::MalformedSourceData(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "MALFORMED_SOURCE_DATA")
        }
        SignpostError::UnknownState(_) => {
            error!(error = %err, "stored record failed state expansion");
            (StatusCode::INTERNAL_SERVER_ERROR, "UNKNOWN_STATE")
        }
        SignpostError::Feed(_) => (StatusCode::BAD_GATEWAY, "FEED_ERROR"),
        SignpostError::Database(_) | SignpostError::Io(_) => {
            error!(error = %err, "internal error");
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL")
        }
    };

    error_response(status, &err.to_string(), code)
}

/// 404 for unmatched paths
pub(crate) fn not_found(path: &str) -> Response<Full<Bytes>> {
    error_response(
        StatusCode::NOT_FOUND,
        &format!("no route for {path}"),
        "NO_ROUTE",
    )
}
