//! Backend Module
//!
//! All server-side code of DocNest: the Axum HTTP API, persistence, object
//! storage, authentication, activity logging and analytics.
//!
//! This module is only compiled when the `server` feature is enabled.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Settings, application state, initialization
//! - **`routes`** - Router assembly and layers
//! - **`auth`** - Passwords, JWTs, Google sign-in, auth handlers
//! - **`documents`** - Upload, update, download and sharing of documents
//! - **`categories`** - Default and custom category labels
//! - **`folders`** - Document folders
//! - **`storage`** - Object storage (local directory or S3)
//! - **`store`** - Persistence traits with PostgreSQL and in-memory backends
//! - **`activity`** - Audit log of user actions
//! - **`analytics`** - Usage events and summaries
//! - **`middleware`** - Authentication, request logging, request tracking
//! - **`error`** - Backend error type and HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - docnest-server binary
//! ├── server/         - Settings, state, initialization
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── documents/      - Document lifecycle
//! ├── categories/     - Category rules
//! ├── folders/        - Folders
//! ├── storage/        - Object storage backends
//! ├── store/          - Persistence
//! ├── activity/       - Activity logging
//! ├── analytics/      - Analytics
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! Handlers share one `AppState`: the settings, a `dyn Store`, a
//! `dyn ObjectStore`, the token issuer, the Google verifier, the link
//! signer, the activity logger and the analytics service. Every piece is
//! behind an `Arc` or cheap to clone.
//!
//! # Error Handling
//!
//! Handlers return `BackendResult<T>`. `BackendError` converts into a JSON
//! body `{"error": ..., "status": ...}` with the matching status code;
//! internal failures are logged and reported generically.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Documents
pub mod documents;

/// Categories
pub mod categories;

/// Folders
pub mod folders;

/// Object storage
pub mod storage;

/// Persistence
pub mod store;

/// Activity logging
pub mod activity;

/// Analytics events
pub mod analytics;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::create_app;
pub use server::state::AppState;
