//! Document Naming and Upload Policy
//!
//! Rules that apply to document metadata and uploaded files regardless of
//! where the bytes end up:
//!
//! - Only `.pdf`, `.doc`, `.docx`, `.jpg`, `.jpeg` and `.png` files are accepted
//! - Files may not exceed the configured maximum size
//! - Document names are 1-255 characters after trimming
//! - Download filenames are reduced to a header-safe ASCII subset

use crate::shared::error::SharedError;

/// File extensions accepted for upload (lower-case, with leading dot)
pub const ALLOWED_EXTENSIONS: [&str; 6] = [".pdf", ".doc", ".docx", ".jpg", ".jpeg", ".png"];

/// Default upload limit: 10 MiB
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Maximum document and folder name length
pub const MAX_NAME_LEN: usize = 255;

/// Extract the lower-cased extension (with leading dot) of a filename
///
/// Returns an empty string when the filename has no extension.
pub fn file_extension(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match base.rfind('.') {
        Some(idx) => base[idx..].to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Upload constraints applied before anything is written to storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Maximum accepted file size in bytes
    pub max_file_size: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl UploadPolicy {
    /// Validate an uploaded file's name and size
    ///
    /// Returns the normalised extension on success.
    ///
    /// # Errors
    ///
    /// `ValidationError` on the `file` field when the filename is empty,
    /// the extension is not allowed, or the file is too large.
    pub fn check(&self, filename: &str, size: usize) -> Result<String, SharedError> {
        if filename.trim().is_empty() {
            return Err(SharedError::validation("file", "No file provided"));
        }

        let ext = file_extension(filename);
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(SharedError::validation(
                "file",
                format!(
                    "File type not allowed. Allowed types: {}",
                    ALLOWED_EXTENSIONS.join(", ")
                ),
            ));
        }

        if size > self.max_file_size {
            return Err(self.too_large());
        }

        Ok(ext)
    }

    /// The error reported when a file exceeds `max_file_size`
    pub fn too_large(&self) -> SharedError {
        let mb = self.max_file_size as f64 / (1024.0 * 1024.0);
        SharedError::validation("file", format!("File too large. Maximum size is {}MB", mb))
    }
}

/// Validate and trim a document or folder name
pub fn validate_name(raw: &str) -> Result<String, SharedError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(SharedError::validation("name", "Name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(SharedError::validation(
            "name",
            format!("Name cannot exceed {} characters", MAX_NAME_LEN),
        ));
    }
    Ok(name.to_string())
}

/// Build the filename offered in `Content-Disposition`
///
/// Keeps ASCII alphanumerics and `.`, `_`, `-`, space; everything else is
/// dropped. Falls back to `document` when nothing survives.
pub fn download_filename(name: &str, ext: &str) -> String {
    fn keep(c: &char) -> bool {
        c.is_ascii_alphanumeric() || matches!(*c, '.' | '_' | '-' | ' ')
    }

    let stem: String = name.chars().filter(keep).collect();
    let stem = stem.trim();
    let ext: String = ext.chars().filter(keep).collect();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        format!("document{}", ext)
    } else {
        format!("{}{}", stem, ext)
    }
}
