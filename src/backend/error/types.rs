/**
 * Backend Error Types
 *
 * This module defines the HTTP-facing error type of the server. Every
 * handler returns `Result<_, BackendError>`; lower layers have their own
 * error enums which convert into it with `?`.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Request-level failures with an explicit status code:
 * - Missing or malformed form fields
 * - Resources that do not exist for the caller
 * - Policy violations (file type, size, category limit)
 *
 * ## Authentication Errors
 *
 * `Unauthorized` carries the message sent with a 401 and always produces a
 * `WWW-Authenticate: Bearer` header.
 *
 * ## Layer Errors
 *
 * - `StoreError` - persistence (not found, conflict, limit, database)
 * - `StorageError` - object storage
 * - `AuthError` - password hashing and token handling
 * - `SharedError` - validation of user input
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::AuthError;
use crate::backend::storage::StorageError;
use crate::backend::store::StoreError;
use crate::shared::SharedError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Backend-specific error types
///
/// # Usage
///
/// ```rust,ignore
/// use docnest::backend::error::BackendError;
///
/// let err = BackendError::not_found("Document not found");
/// let err = BackendError::unauthorized("Could not validate credentials");
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status code
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Missing or invalid credentials (401 with `WWW-Authenticate`)
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Application state is unusable (e.g. misconfigured backend)
    #[error("State error: {message}")]
    StateError { message: String },

    /// Validation error from the shared module
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Persistence error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Object storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Credential handling error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    ///
    /// # Arguments
    ///
    /// * `status` - HTTP status code
    /// * `message` - Error message
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    /// 404 Not Found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    /// 401 Unauthorized
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a new state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::StateError {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `Unauthorized` - 401
    /// - `StateError`, `SerializationError`, `Auth` - 500
    /// - `SharedError` - 400 for validation, 500 for serialization
    /// - `Store` - 404 / 409 / 500
    /// - `Storage` - 404 for missing objects, 400 for bad keys, else 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::StateError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            },
            Self::Store(err) => match err {
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::Conflict(_) => StatusCode::CONFLICT,
                StoreError::LimitReached(_) => StatusCode::BAD_REQUEST,
                StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Storage(err) => match err {
                StorageError::NotFound(_) => StatusCode::NOT_FOUND,
                StorageError::InvalidKey(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message sent to the client
    ///
    /// Internal failures are reported with a generic message; the detail is
    /// only logged.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Unauthorized { message } => message.clone(),
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => err.to_string(),
                SharedError::SerializationError { .. } => INTERNAL_MESSAGE.to_string(),
            },
            Self::Store(err) => match err {
                StoreError::Database(_) => INTERNAL_MESSAGE.to_string(),
                other => other.to_string(),
            },
            Self::Storage(err) => match err {
                StorageError::NotFound(_) | StorageError::InvalidKey(_) => err.to_string(),
                _ => "Storage operation failed".to_string(),
            },
            Self::StateError { .. } | Self::Auth(_) | Self::SerializationError(_) => {
                INTERNAL_MESSAGE.to_string()
            }
        }
    }
}
