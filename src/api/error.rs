//! API error handling.
//!
//! Every error response has the body `{"error": "<message>"}`. Internal
//! failure details go to the log, never to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::application::ServiceError;

/// Message returned for unparsable request bodies.
pub const INVALID_JSON: &str = "Invalid JSON";

/// Message returned for storage and other internal failures.
pub const INTERNAL_ERROR: &str = "An internal error occurred";

// =============================================================================
// API Error
// =============================================================================

/// Error body sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    /// Creates an error body with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

// =============================================================================
// API Error Response
// =============================================================================

/// An error body paired with its status code.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    pub status: StatusCode,
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates an error response with an explicit status.
    #[must_use]
    pub const fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }

    /// Creates a 400 Bad Request response.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiError::new(message))
    }

    /// Creates a 400 response for a body that is not valid JSON.
    #[must_use]
    pub fn invalid_json() -> Self {
        Self::bad_request(INVALID_JSON)
    }

    /// Creates a 400 response naming a missing or blank field.
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::bad_request(format!("'{field}' is required"))
    }

    /// Creates a 404 Not Found response.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiError::new(message))
    }

    /// Creates a 500 response with a generic message.
    #[must_use]
    pub fn internal_error() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new(INTERNAL_ERROR),
        )
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

/// Service failures a handler does not translate itself become a logged
/// `500` with [`INTERNAL_ERROR`] as the message.
impl From<ServiceError> for ApiErrorResponse {
    fn from(error: ServiceError) -> Self {
        tracing::error!(%error, "Internal error");
        Self::internal_error()
    }
}

// =============================================================================
// Tests
// =============================================================================
