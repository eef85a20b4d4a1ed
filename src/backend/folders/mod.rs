//! Folders Module
//!
//! User-owned groupings of documents. A folder has a default category and
//! a document belongs to at most one folder. Deleting a folder detaches
//! its documents instead of deleting them.

/// HTTP handlers
pub mod handlers;

pub use handlers::{create_folder, delete_folder, get_folder, list_folders};
