//! Error handling for the Kith server

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Server error types
#[derive(Debug, Error)]
pub enum ServerError {
    /// Kith library error
    #[error("{0}")]
    Kith(#[from] kith::KithError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Validation error
    #[error("{0}")]
    Validation(String),

    /// Not found error
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request error
    #[error("{0}")]
    BadRequest(String),

    /// Conflict with existing state
    #[error("{0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<kith::storage::StorageError> for ServerError {
    fn from(err: kith::storage::StorageError) -> Self {
        ServerError::Kith(kith::KithError::Storage(err))
    }
}

impl ServerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Self-reference is a client mistake; a missing account is a
            // 404 class rather than the upstream 500.
            ServerError::Kith(kith::KithError::SelfReference(_)) => StatusCode::BAD_REQUEST,
            ServerError::Kith(kith::KithError::AccountNotFound(_)) => StatusCode::NOT_FOUND,
            ServerError::Kith(kith::KithError::Validation(_)) => StatusCode::BAD_REQUEST,
            // A store-level uniqueness violation (e.g. a register racing
            // past the email pre-check) is a conflict, not a failure.
            ServerError::Kith(kith::KithError::Storage(
                kith::storage::StorageError::AlreadyExists(_),
            )) => StatusCode::CONFLICT,
            ServerError::Auth(_) => StatusCode::UNAUTHORIZED,
            ServerError::Validation(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::Kith(kith::KithError::SelfReference(_)) => "self_reference",
            ServerError::Kith(kith::KithError::AccountNotFound(_)) => "not_found",
            ServerError::Kith(kith::KithError::Storage(
                kith::storage::StorageError::AlreadyExists(_),
            )) => "conflict",
            ServerError::Kith(_) => "kith_error",
            ServerError::Auth(_) => "authentication_error",
            ServerError::Validation(_) => "validation_error",
            ServerError::NotFound(_) => "not_found",
            ServerError::BadRequest(_) => "bad_request",
            ServerError::Conflict(_) => "conflict",
            ServerError::Internal(_) => "internal_error",
            ServerError::Serialization(_) => "serialization_error",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = ErrorResponse {
            error: self.error_type().to_string(),
            message: self.to_string(),
            details: None,
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Helper function to create a not found error
pub fn not_found(resource: &str, id: &str) -> ServerError {
    ServerError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Helper function to create a bad request error
pub fn bad_request(message: &str) -> ServerError {
    ServerError::BadRequest(message.to_string())
}
