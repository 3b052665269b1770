//! Health check endpoints
//!
//! - /health, /healthz - liveness probe (is the service running?)
//! - /version - deployment verification
//!
//! Liveness returns 200 whenever the process is up; the database handle is
//! lazy, so its reachability is not part of liveness.

use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;
use serde::Serialize;

use crate::routes::json_response;
use crate::server::AppState;

/// Health response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall health status (true if service is running)
    pub healthy: bool,
    /// Service version
    pub version: &'static str,
    /// Node identifier
    pub node_id: String,
    /// Current timestamp
    pub timestamp: String,
}

/// Version info response
#[derive(Serialize)]
pub struct VersionResponse {
    pub name: &'static str,
    pub version: &'static str,
}

/// Handle liveness probes
pub fn health_check(state: &AppState) -> Response<Full<Bytes>> {
    let response = HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
        node_id: state.args.node_id.to_string(),
        timestamp: bson::DateTime::now()
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    };

    json_response(&response)
}

/// Handle version requests
pub fn version_info() -> Response<Full<Bytes>> {
    json_response(&VersionResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}
