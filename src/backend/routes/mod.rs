//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Architecture
//!
//! - **`router`** - Main router creation, layers and fallback
//! - **`api_routes`** - Everything under the API prefix
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - API endpoint routes
//! ```
//!
//! # Route Types
//!
//! ## Unauthenticated
//!
//! - `GET /health` - Liveness check
//! - `GET {API_V1_STR}/files/{*key}` - Signed download links (local storage)
//! - `POST /api/v1/auth/register`, `/auth/login`, `/auth/google/signin`
//!
//! ## Bearer Token
//!
//! Everything else under `/api/v1`: documents, categories, folders,
//! analytics and the remaining auth endpoints.
//!
//! # Example
//!
//! ```rust,no_run
//! use docnest::backend::routes::create_router;
//! use docnest::backend::server::{config::Settings, state::AppState};
//!
//! let app_state = AppState::builder(Settings::development()).build();
//! let router = create_router(app_state);
//! ```

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
