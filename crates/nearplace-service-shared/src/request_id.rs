//! Request correlation ids.
//!
//! Requests carry an `X-Request-ID` header when the caller supplies one;
//! otherwise a time-sortable UUID v7 is generated. The id is only used for
//! log correlation.

use axum::http::HeaderMap;
use uuid::Uuid;

/// Newtype wrapper for request correlation IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Create a request ID from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new UUID v7 request ID.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the request ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Extract the request ID from headers or generate a new UUID v7.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}
