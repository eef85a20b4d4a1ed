//! Shared Module
//!
//! Domain rules that need no server dependencies: category naming and
//! validation, document upload policy, and the validation error type.
//! These compile without the `server` feature, so a client can apply the
//! same checks before sending a request.

/// Category labels and validation
pub mod category;

/// Document upload policy and naming
pub mod document;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use document::UploadPolicy;
pub use error::SharedError;
