//! DocNest - Main Library
//!
//! DocNest is a multi-tenant document storage API. Users register (with a
//! password or Google), upload files to object storage, organize them
//! with default and custom categories and folders, and share them through
//! time-limited download links. Every action is recorded in an activity
//! log, and API usage is tracked as analytics events.
//!
//! # Module Structure
//!
//! - **`shared`** - Dependency-light domain rules
//!   - Category normalization and validation
//!   - Upload policy (allowed extensions, size limit)
//!   - Validation error type
//!
//! - **`backend`** - Server-side code (only compiled with the `server` feature)
//!   - Axum HTTP API under `/api/v1`
//!   - PostgreSQL persistence via sqlx, or an in-memory store
//!   - Local or S3 object storage
//!   - JWT authentication and Google sign-in
//!   - Activity logging and analytics
//!
//! # Feature Flags
//!
//! - **`server`** (default) - Enables the backend module and the
//!   `docnest-server` binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use docnest::backend::server::{config::Settings, create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(Settings::from_env()?).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::error::SharedError` for validation failures
//! - `backend::error::BackendError` for everything a handler can return;
//!   it renders as `{"error": ..., "status": ...}`

/// Shared types and validation rules
pub mod shared;

/// Backend server-side code
#[cfg(feature = "server")]
pub mod backend;
