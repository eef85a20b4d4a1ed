//! Server Module
//!
//! This module contains the code that initializes and configures the Axum
//! HTTP server.
//!
//! # Architecture
//!
//! - **`state`** - Application state structure and `FromRef` implementations
//! - **`config`** - Settings loading and validation, database connection
//! - **`init`** - Server initialization and app creation
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState, its builder and FromRef implementations
//! ├── config.rs       - Settings and database loading
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `Settings::from_env()`
//! 2. **Persistence**: PostgreSQL with migrations, or the in-memory store
//! 3. **Object Storage**: Local directory or S3, with an access check
//! 4. **Router Creation**: Routes, CORS, body limit and middleware
//!
//! # Example
//!
//! ```rust,no_run
//! use docnest::backend::server::{config::Settings, create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::from_env()?;
//! let app = create_app(settings).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::Settings;
pub use init::create_app;
pub use state::AppState;
