//! Health check handlers for liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok" or "not_ready: <reason>".
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build time.
    pub version: String,

    /// Number of places indexed (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub places_indexed: Option<usize>,
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            places_indexed: None,
        }
    }

    /// Create a ready status with index information.
    pub fn ready(service: &str, version: &str, places_indexed: usize) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            places_indexed: Some(places_indexed),
        }
    }

    /// Create a not-ready status.
    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            service: service.to_string(),
            version: version.to_string(),
            places_indexed: None,
        }
    }
}

/// Liveness probe handler.
///
/// Returns 200 OK whenever the process is running.
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// Returns 200 OK once the spatial index holds at least one place; an empty
/// index cannot enrich anything and reports 503.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let places_indexed = state.index().len();
    if places_indexed == 0 {
        let status = HealthStatus::not_ready(service, version, "no places indexed");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let status = HealthStatus::ready(service, version, places_indexed);
    (StatusCode::OK, Json(status)).into_response()
}
