//! Object Storage Module
//!
//! Document files live in an object store addressed by string keys of the
//! form `documents/{owner_id}/{uuid}{ext}`. The `ObjectStore` trait hides
//! whether that is a local directory or an S3 bucket.
//!
//! # Architecture
//!
//! - **`local`** - Files below `UPLOAD_DIR`, served back through signed links
//! - **`s3`** - Amazon S3 (or an S3-compatible endpoint) through `aws-sdk-s3`
//! - **`signing`** - HMAC link signer used by the local backend
//! - **`sniff`** - Magic-byte content type detection
//! - **`handlers`** - `GET {API_V1_STR}/files/{*key}` for signed local links
//!
//! # Module Structure
//!
//! ```text
//! storage/
//! ├── mod.rs          - ObjectStore trait, StorageError, upload_file
//! ├── local.rs        - Filesystem backend
//! ├── s3.rs           - S3 backend
//! ├── signing.rs      - Download link signing
//! ├── sniff.rs        - Content type detection
//! └── handlers.rs     - Signed file download handler
//! ```

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::document::file_extension;

/// Filesystem backend
pub mod local;

/// Amazon S3 backend
pub mod s3;

/// HMAC download link signing
pub mod signing;

/// Content type sniffing
pub mod sniff;

/// Signed download handler
pub mod handlers;

pub use local::LocalObjectStore;
pub use s3::S3ObjectStore;
pub use signing::LinkSigner;

/// Object storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key is empty, absolute, or escapes its prefix
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// No object under this key
    #[error("File not found in storage")]
    NotFound(String),

    /// Local filesystem failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The remote store answered with an error
    #[error("Storage error {status} ({code}): {message}")]
    Remote {
        status: u16,
        code: String,
        message: String,
    },

    /// Backend is misconfigured
    #[error("Storage configuration error: {0}")]
    Config(String),
}

/// Result alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// An object read back from storage
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
    pub content_length: u64,
}

/// Result of [`upload_file`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedObject {
    pub key: String,
    pub size: u64,
    pub content_type: String,
}

/// Key-addressed blob storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key`, replacing any existing object
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> StorageResult<()>;

    /// Read an object; `NotFound` when missing
    async fn get(&self, key: &str) -> StorageResult<StoredObject>;

    /// Delete an object; deleting a missing key succeeds
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// A URL that downloads `key` without credentials until it expires
    async fn presigned_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Check that the store is reachable and writable
    async fn verify_access(&self) -> StorageResult<()>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Reject keys that are empty, absolute, or contain `.`/`..` segments
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    if key
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Upload a file under `folder` with a fresh unique key
///
/// The key is `{folder}/{uuid}{ext}` where `ext` is the lower-cased
/// extension of `filename`. The content type is sniffed from the bytes.
///
/// # Errors
///
/// Whatever the backend's `put` returns; nothing is written on error.
pub async fn upload_file(
    store: &dyn ObjectStore,
    folder: &str,
    filename: &str,
    body: Bytes,
) -> StorageResult<UploadedObject> {
    let key = format!(
        "{}/{}{}",
        folder.trim_end_matches('/'),
        Uuid::new_v4(),
        file_extension(filename)
    );
    validate_key(&key)?;

    let content_type = sniff::detect_content_type(&body).to_string();
    let size = body.len() as u64;

    tracing::debug!(
        "Uploading {} ({} bytes, {}) to {} storage",
        key,
        size,
        content_type,
        store.backend_name()
    );
    store.put(&key, body, &content_type).await?;

    Ok(UploadedObject {
        key,
        size,
        content_type,
    })
}
