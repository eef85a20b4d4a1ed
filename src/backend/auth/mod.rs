//! Authentication Module
//!
//! This module handles user registration, password and Google sign-in, and
//! the bearer tokens that authenticate every other API call.
//!
//! # Architecture
//!
//! - **`users`** - Password hashing, credential checks, Google get-or-create
//! - **`sessions`** - JWT access/refresh token issuing and validation
//! - **`google`** - Google ID token verification
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and AuthError
//! ├── users.rs        - User account operations
//! ├── sessions.rs     - JWT token management
//! ├── google.rs       - Google token verification
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     ├── types.rs    - Request/response types
//!     ├── register.rs - POST /auth/register
//!     ├── login.rs    - POST /auth/login
//!     ├── google.rs   - POST /auth/google/signin
//!     ├── session.rs  - POST /auth/refresh, POST /auth/logout
//!     └── me.rs       - GET /auth/me
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: email + password → user created → `UserResponse`
//! 2. **Login**: OAuth2 password form → credentials verified → access + refresh tokens
//! 3. **Google**: ID token → verified with Google → user found or created → access token
//! 4. **Authenticated calls**: `Authorization: Bearer <token>` → `CurrentUser`
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Google accounts have an empty hash and can never log in with a password
//! - Invalid credentials return 401 with `WWW-Authenticate: Bearer`

use thiserror::Error;

/// User account operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// Google ID token verification
pub mod google;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use google::{GoogleIdentity, GoogleTokenVerifier, IdTokenVerifier};
pub use handlers::types::{LoginForm, RegisterRequest, TokenResponse, UserResponse};
pub use handlers::{google_signin, login, logout, me, refresh, register};
pub use sessions::{Claims, TokenIssuer, TokenKind};

/// Credential handling failures
#[derive(Debug, Error)]
pub enum AuthError {
    /// bcrypt failed to hash a password
    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// A token could not be encoded or decoded
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Google rejected the ID token or it failed a claim check
    #[error("{0}")]
    Google(String),
}
