//! Plain-text fault responses.
//!
//! The transform surface reports failures as a status code plus a short
//! explanatory plain-text body; no structured error payload is produced.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// A request-level failure rendered as a plain-text HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    status: StatusCode,
    message: String,
}

impl Fault {
    /// Create a fault with an explicit status code.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// A 400 Bad Request fault for malformed client input.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// A 500 Internal Server Error fault.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// The HTTP status of this fault.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The explanatory message of this fault.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for Fault {}

impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}
