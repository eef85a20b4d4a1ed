//! Authentication Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types
//! ├── register.rs - User registration handler
//! ├── login.rs    - Password login handler
//! ├── google.rs   - Google sign-in handler
//! ├── session.rs  - Token refresh and logout
//! └── me.rs       - Get current user handler
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /auth/register
//! - **`login`** - POST /auth/login
//! - **`google_signin`** - POST /auth/google/signin
//! - **`refresh`** - POST /auth/refresh
//! - **`logout`** - POST /auth/logout
//! - **`me`** - GET /auth/me

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Google sign-in handler
pub mod google;

/// Refresh and logout handlers
pub mod session;

/// Get current user handler
pub mod me;

pub use google::google_signin;
pub use login::login;
pub use me::me;
pub use register::register;
pub use session::{logout, refresh};
