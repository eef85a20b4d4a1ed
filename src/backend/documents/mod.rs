//! Documents Module
//!
//! A document pairs metadata (name, description, category, version,
//! folder) with one file in object storage under
//! `documents/{owner_id}/{uuid}{ext}`.
//!
//! # Architecture
//!
//! - **`form`** - Multipart parsing with an upload size cap
//! - **`service`** - Create, update and delete flows that keep the
//!   metadata store and the object store consistent
//! - **`handlers`** - HTTP handlers and activity logging
//!
//! # Module Structure
//!
//! ```text
//! documents/
//! ├── mod.rs          - Module exports
//! ├── form.rs         - Multipart form reader
//! ├── service.rs      - Document lifecycle
//! └── handlers.rs     - HTTP handlers
//! ```

/// Multipart form reader
pub mod form;

/// Document lifecycle
pub mod service;

/// HTTP handlers
pub mod handlers;

pub use form::{read_document_form, DocumentForm, UploadedFile};
pub use handlers::{
    create_document, delete_document, download_document, get_document, list_documents,
    share_document, update_document,
};
pub use service::{DocumentService, ShareInfo};
