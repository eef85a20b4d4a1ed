//! Category Rules
//!
//! Every user sees the four built-in categories plus up to
//! [`MAX_CUSTOM_CATEGORIES`] labels of their own. Labels are stored in a
//! canonical form: trimmed, upper-cased, and with each run of whitespace
//! collapsed to a single `_` (`" tax  returns "` becomes `"TAX_RETURNS"`).
//!
//! The functions here are pure; persistence and the per-user limit check
//! live in the backend category service.

use crate::shared::error::SharedError;

/// Built-in categories, available to every user and never editable
pub const DEFAULT_CATEGORIES: [&str; 4] = ["GOVERNMENT", "MEDICAL", "EDUCATIONAL", "OTHER"];

/// Category that documents fall back to when their custom label is deleted
pub const FALLBACK_CATEGORY: &str = "OTHER";

/// Maximum number of custom categories per user
pub const MAX_CUSTOM_CATEGORIES: usize = 20;

/// Minimum length of a custom category name (after normalisation)
pub const MIN_NAME_LEN: usize = 2;

/// Maximum length of a custom category name (after normalisation)
pub const MAX_NAME_LEN: usize = 30;

/// Bring a user-supplied label into canonical form
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace()
        .map(|part| part.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Whether `name` (in any case/spacing) is one of the built-in categories
pub fn is_default(name: &str) -> bool {
    let normalized = normalize(name);
    DEFAULT_CATEGORIES.iter().any(|d| *d == normalized)
}

/// Validate the format of a custom category name
///
/// Returns the normalised name on success.
///
/// # Errors
///
/// A `ValidationError` on the `name` field when the name is empty, has the
/// wrong length, does not start with a letter, uses characters outside
/// `A-Z 0-9 _ -`, or collides with a built-in category.
pub fn validate_custom_name(raw: &str) -> Result<String, SharedError> {
    let name = normalize(raw);

    if name.is_empty() {
        return Err(SharedError::validation("name", "Category name cannot be empty"));
    }

    let len = name.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(SharedError::validation(
            "name",
            format!(
                "Category name must be {}-{} characters long",
                MIN_NAME_LEN, MAX_NAME_LEN
            ),
        ));
    }

    if !name.starts_with(|c: char| c.is_ascii_uppercase()) {
        return Err(SharedError::validation("name", "Category name must start with a letter"));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(SharedError::validation(
            "name",
            "Category name may only contain letters, digits, underscores and hyphens",
        ));
    }

    if DEFAULT_CATEGORIES.contains(&name.as_str()) {
        return Err(SharedError::validation(
            "name",
            format!("'{}' is a default category", name),
        ));
    }

    Ok(name)
}

/// Merge the defaults with a user's custom labels
///
/// Order is preserved (defaults first, then custom labels in the order
/// given) and duplicates are dropped.
pub fn available_categories<S: AsRef<str>>(custom: &[S]) -> Vec<String> {
    let mut all: Vec<String> = Vec::with_capacity(DEFAULT_CATEGORIES.len() + custom.len());
    let candidates = DEFAULT_CATEGORIES
        .iter()
        .map(|s| s.to_string())
        .chain(custom.iter().map(|s| normalize(s.as_ref())));

    for name in candidates {
        if !all.contains(&name) {
            all.push(name);
        }
    }
    all
}

/// Resolve a category supplied on a document or folder
///
/// The input is normalised and must be one of `available`.
pub fn resolve<S: AsRef<str>>(raw: &str, available: &[S]) -> Result<String, SharedError> {
    let name = normalize(raw);
    if name.is_empty() {
        return Err(SharedError::validation("category", "Category is required"));
    }
    if available.iter().any(|c| c.as_ref() == name) {
        Ok(name)
    } else {
        Err(SharedError::validation(
            "category",
            format!("Unknown category '{}'", name),
        ))
    }
}
