//! Nearest-place enrichment HTTP microservice.
//!
//! Accepts a JSON array of entities on `POST /transform` and streams back
//! the same array in the same order, each coordinate-carrying entity
//! augmented with a `nearest_place` block.
//!
//! # Endpoints
//!
//! - `POST /transform` - Enrich a batch of entities
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//!
//! All business logic lives in `nearplace-lib`; this crate is HTTP glue.

#![deny(warnings)]

mod stream;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use nearplace_lib::Entity;
use nearplace_service_shared::{
    extract_or_generate_request_id, health_live, health_ready, AppState, Fault,
};

use crate::stream::{enriched_array_stream, has_coordinates};

/// Build the transform service router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/transform", post(transform_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle POST /transform requests.
///
/// The whole batch is parsed up front so a malformed body is rejected before
/// any output is produced; enrichment itself happens lazily while the
/// response streams.
async fn transform_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = extract_or_generate_request_id(&headers);

    if body.is_empty() {
        warn!(request_id = %request_id, "rejecting request with no body");
        return Fault::bad_request("request body must be a JSON array of entities")
            .into_response();
    }

    let entities: Vec<Entity> = match serde_json::from_slice(&body) {
        Ok(entities) => entities,
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "rejecting malformed request body");
            return Fault::bad_request(format!(
                "request body is not a JSON array of objects: {}",
                e
            ))
            .into_response();
        }
    };

    // An empty index cannot enrich anything; fail the request before the
    // response status is committed.
    if state.index().is_empty() && entities.iter().any(has_coordinates) {
        warn!(request_id = %request_id, "no places indexed; cannot enrich");
        return Fault::internal_error("no places are indexed; enrichment is unavailable")
            .into_response();
    }

    info!(
        request_id = %request_id,
        entities = entities.len(),
        "streaming enriched entities"
    );

    let body = Body::from_stream(enriched_array_stream(state, entities, request_id));
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
