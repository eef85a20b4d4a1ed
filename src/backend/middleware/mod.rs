//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! # Architecture
//!
//! - **`auth`** - Bearer token authentication (`auth_middleware`, `CurrentUser`)
//! - **`analytics`** - `api_request` event recording
//! - **`request_log`** - One log line per request
//!
//! # Layer Order
//!
//! Request logging wraps everything, analytics tracking sits inside it, and
//! `auth_middleware` is applied as a route layer on the protected routes
//! only.

pub mod auth;

pub mod analytics;

pub mod request_log;

pub use analytics::track_api_requests;
pub use auth::{auth_middleware, authenticate_headers, AuthenticatedUser, CurrentUser};
pub use request_log::log_requests;
