//! Categories Module
//!
//! Every document and folder carries one category label: one of the four
//! defaults (`GOVERNMENT`, `MEDICAL`, `EDUCATIONAL`, `OTHER`) or one of up
//! to 20 custom labels defined by its owner.
//!
//! # Module Structure
//!
//! ```text
//! categories/
//! ├── mod.rs          - Module exports
//! ├── service.rs      - Per-user category rules
//! └── handlers.rs     - HTTP handlers
//! ```

/// Per-user category rules
pub mod service;

/// HTTP handlers
pub mod handlers;

pub use handlers::{create_category, delete_category, list_categories, rename_category};
pub use service::{resolve_category, CategoryList, DeleteOutcome, RenameOutcome};
