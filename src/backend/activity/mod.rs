//! Activity Module
//!
//! Per-user audit trail of document, folder and category operations.
//!
//! # Module Structure
//!
//! ```text
//! activity/
//! ├── mod.rs      - Module exports
//! ├── meta.rs     - RequestMeta extractor (IP, user agent, referer, language)
//! └── logger.rs   - ActivityLogger
//! ```

/// Client metadata extraction
pub mod meta;

/// Activity log writer
pub mod logger;

pub use logger::ActivityLogger;
pub use meta::RequestMeta;
