//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are used in HTTP handlers and can be converted to HTTP responses.
//!
//! # Architecture
//!
//! - **`types`** - Error type definitions and constructors
//! - **`conversion`** - `IntoResponse` implementation
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - Error conversion implementations
//! ```
//!
//! # Error Types
//!
//! - `HandlerError` - Request failures with an explicit status
//! - `Unauthorized` - 401 with a bearer challenge
//! - `StateError` - Unusable application state
//! - `SharedError` / `Store` / `Storage` / `Auth` - wrapped layer errors
//!
//! # HTTP Response Conversion
//!
//! Handlers return `Result<T, BackendError>`; the error becomes a JSON body
//! `{"error": ..., "status": ...}` with the mapped status code.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;

/// Result alias for handlers
pub type BackendResult<T> = Result<T, BackendError>;
