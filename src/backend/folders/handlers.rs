/**
 * Folder Handlers
 *
 * - `POST /folders` - create (201)
 * - `GET /folders` - list, alphabetical
 * - `GET /folders/{id}` - fetch one
 * - `DELETE /folders/{id}` - delete (204); contained documents are kept
 *   and detached from the folder
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::backend::activity::RequestMeta;
use crate::backend::categories::resolve_category;
use crate::backend::documents::service::FOLDER_NOT_FOUND;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::CurrentUser;
use crate::backend::server::state::AppState;
use crate::backend::store::{Folder, FolderStore};
use crate::shared::document::validate_name;

const RESOURCE: &str = "folder";

#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
}

/// Create a folder
///
/// # Errors
///
/// * `400 Bad Request` - Invalid name or category
pub async fn create_folder(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    meta: RequestMeta,
    Json(request): Json<CreateFolderRequest>,
) -> BackendResult<(StatusCode, Json<Folder>)> {
    let name = validate_name(&request.name)?;
    let category = resolve_category(state.store.as_ref(), user.id, &request.category).await?;

    let now = Utc::now();
    let folder = state
        .store
        .insert_folder(&Folder {
            id: Uuid::new_v4(),
            name,
            description: request
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            category,
            owner_id: user.id,
            created_at: now,
            updated_at: now,
        })
        .await?;

    state
        .activity
        .log_activity(
            user.id,
            "folder.create",
            RESOURCE,
            Some(folder.id.to_string()),
            json!({ "name": folder.name, "category": folder.category }),
            &meta,
        )
        .await;

    Ok((StatusCode::CREATED, Json(folder)))
}

pub async fn list_folders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> BackendResult<Json<Vec<Folder>>> {
    Ok(Json(state.store.list_folders(user.id).await?))
}

pub async fn get_folder(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> BackendResult<Json<Folder>> {
    state
        .store
        .find_folder(user.id, id)
        .await?
        .map(Json)
        .ok_or_else(|| BackendError::not_found(FOLDER_NOT_FOUND))
}

pub async fn delete_folder(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    meta: RequestMeta,
    Path(id): Path<Uuid>,
) -> BackendResult<StatusCode> {
    if !state.store.delete_folder(user.id, id).await? {
        return Err(BackendError::not_found(FOLDER_NOT_FOUND));
    }

    state
        .activity
        .log_activity(
            user.id,
            "folder.delete",
            RESOURCE,
            Some(id.to_string()),
            json!({}),
            &meta,
        )
        .await;

    Ok(StatusCode::NO_CONTENT)
}
