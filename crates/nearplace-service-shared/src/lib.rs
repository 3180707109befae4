//! Shared infrastructure for nearplace HTTP microservices.
//!
//! This crate provides the common functionality used by the service
//! containers:
//!
//! - [`AppState`]: the gazetteer spatial index, built once at startup and
//!   shared read-only by every request handler
//! - [`health`]: liveness/readiness probe handlers
//! - [`Fault`]: plain-text error responses with the right status code
//! - [`logging`]: structured logging setup
//! - [`RequestId`]: correlation id extraction/generation
//!
//! The services follow a thin-handler pattern: all enrichment logic lives in
//! `nearplace-lib`, and this crate provides only HTTP glue around it.

#![deny(warnings)]

mod fault;
mod health;
pub mod logging;
mod request_id;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use fault::Fault;
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use request_id::{extract_or_generate_request_id, RequestId};
pub use state::{AppState, AppStateError};
