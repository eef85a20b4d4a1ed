//! Shared Error Types
//!
//! This module defines error types produced by the pure, framework-free
//! rules in `shared` (category validation, document naming, upload policy).
//! The backend wraps them in `BackendError` and maps them to HTTP responses.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - Data validation failures (always a client error)
//!
//! # Usage
//!
//! ```rust
//! use docnest::shared::error::SharedError;
//!
//! let error = SharedError::validation("name", "Category name must be 2-30 characters long");
//! ```
use thiserror::Error;

/// Errors raised by the shared validation rules
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    ///
    /// The `message` is what clients see; `field` is kept for logging.
    #[error("{message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// `ValidationError` on `field` when `value` is longer than `max` characters
    pub fn check_length(field: &str, value: &str, max: usize) -> Result<(), Self> {
        if value.chars().count() > max {
            return Err(Self::validation(
                field,
                format!("{} must be at most {} characters", field, max),
            ));
        }
        Ok(())
    }

    /// Field name for validation errors, `None` otherwise
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationError { field, .. } => Some(field),
            Self::SerializationError { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
