/**
 * Category Service
 *
 * Per-user category rules on top of `CategoryStore`. Format rules live in
 * `shared::category`; this layer adds the checks that need the user's
 * existing labels (duplicates, the custom limit, rename targets).
 */

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::store::{CategoryStore, CustomCategory, StoreError, StoreResult};
use crate::shared::category::{
    self, available_categories, is_default, normalize, validate_custom_name, DEFAULT_CATEGORIES,
    FALLBACK_CATEGORY, MAX_CUSTOM_CATEGORIES,
};

/// Response of `GET /categories`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryList {
    pub defaults: Vec<String>,
    pub custom: Vec<String>,
    pub all: Vec<String>,
}

/// Response of `PUT /categories/{name}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameOutcome {
    pub category: String,
    pub documents_updated: u64,
}

/// Response of `DELETE /categories/{name}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub deleted: String,
    pub documents_reassigned: u64,
}

/// Names of the owner's custom categories in creation order
pub async fn custom_names<S: CategoryStore + ?Sized>(
    store: &S,
    owner_id: Uuid,
) -> StoreResult<Vec<String>> {
    Ok(store
        .list_custom_categories(owner_id)
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect())
}

/// Defaults, custom labels, and their union
pub async fn list_categories<S: CategoryStore + ?Sized>(
    store: &S,
    owner_id: Uuid,
) -> StoreResult<CategoryList> {
    let custom = custom_names(store, owner_id).await?;
    let all = available_categories(&custom);
    Ok(CategoryList {
        defaults: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        custom,
        all,
    })
}

/// Normalise `raw` and check that the owner may use it on a document or folder
///
/// # Errors
///
/// `400 Bad Request` when the category is empty or unknown to the owner.
pub async fn resolve_category<S: CategoryStore + ?Sized>(
    store: &S,
    owner_id: Uuid,
    raw: &str,
) -> BackendResult<String> {
    let custom = custom_names(store, owner_id).await?;
    Ok(category::resolve(raw, &available_categories(&custom))?)
}

/// Create a custom category
///
/// # Errors
///
/// * `400 Bad Request` - Invalid name, default name, or limit reached
/// * `409 Conflict` - The owner already has this category
pub async fn create_category<S: CategoryStore + ?Sized>(
    store: &S,
    owner_id: Uuid,
    raw: &str,
) -> BackendResult<CustomCategory> {
    let name = validate_custom_name(raw)?;

    let category = store
        .insert_custom_category(
            &CustomCategory {
                id: Uuid::new_v4(),
                owner_id,
                name,
                created_at: Utc::now(),
            },
            MAX_CUSTOM_CATEGORIES,
        )
        .await?;

    tracing::info!("Created category {} for user {}", category.name, owner_id);
    Ok(category)
}

/// Rename a custom category and cascade the new label to the owner's
/// documents and folders
///
/// # Errors
///
/// * `400 Bad Request` - Default category, invalid new name, or unchanged name
/// * `404 Not Found` - The owner has no such custom category
/// * `409 Conflict` - The new name is already taken
pub async fn rename_category<S: CategoryStore + ?Sized>(
    store: &S,
    owner_id: Uuid,
    current: &str,
    new_name: &str,
) -> BackendResult<RenameOutcome> {
    let current = normalize(current);
    if is_default(&current) {
        return Err(BackendError::bad_request("Default categories cannot be renamed"));
    }

    let existing = custom_names(store, owner_id).await?;
    if !existing.contains(&current) {
        return Err(StoreError::NotFound("Category").into());
    }

    let target = validate_custom_name(new_name)?;
    if target == current {
        return Err(BackendError::bad_request(
            "New category name must differ from the current name",
        ));
    }
    if existing.contains(&target) {
        return Err(already_exists(&target));
    }

    let documents_updated = store
        .rename_custom_category(owner_id, &current, &target)
        .await?;

    tracing::info!(
        "Renamed category {} to {} for user {} ({} documents)",
        current,
        target,
        owner_id,
        documents_updated
    );
    Ok(RenameOutcome {
        category: target,
        documents_updated,
    })
}

/// Delete a custom category, moving its documents and folders to `OTHER`
///
/// # Errors
///
/// * `400 Bad Request` - Default category
/// * `404 Not Found` - The owner has no such custom category
pub async fn delete_category<S: CategoryStore + ?Sized>(
    store: &S,
    owner_id: Uuid,
    raw: &str,
) -> BackendResult<DeleteOutcome> {
    let name = normalize(raw);
    if is_default(&name) {
        return Err(BackendError::bad_request("Default categories cannot be deleted"));
    }

    let documents_reassigned = store
        .delete_custom_category(owner_id, &name, FALLBACK_CATEGORY)
        .await?;

    tracing::info!(
        "Deleted category {} for user {} ({} documents moved to {})",
        name,
        owner_id,
        documents_reassigned,
        FALLBACK_CATEGORY
    );
    Ok(DeleteOutcome {
        deleted: name,
        documents_reassigned,
    })
}

fn already_exists(name: &str) -> BackendError {
    StoreError::Conflict(format!("Category '{}' already exists", name)).into()
}
