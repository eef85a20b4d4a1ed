/**
 * Category Handlers
 *
 * - `GET /categories` - defaults, custom labels and their union
 * - `POST /categories` - create a custom label (201)
 * - `PUT /categories/{name}` - rename a custom label, cascading to documents
 * - `DELETE /categories/{name}` - delete a custom label, moving documents to `OTHER`
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::backend::activity::RequestMeta;
use crate::backend::categories::service::{
    self, CategoryList, DeleteOutcome, RenameOutcome,
};
use crate::backend::error::BackendResult;
use crate::backend::middleware::CurrentUser;
use crate::backend::server::state::AppState;
use crate::backend::store::CustomCategory;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameCategoryRequest {
    pub new_name: String,
}

pub async fn list_categories(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> BackendResult<Json<CategoryList>> {
    Ok(Json(service::list_categories(state.store.as_ref(), user.id).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    meta: RequestMeta,
    Json(request): Json<CreateCategoryRequest>,
) -> BackendResult<(StatusCode, Json<CustomCategory>)> {
    let category = service::create_category(state.store.as_ref(), user.id, &request.name).await?;

    state
        .activity
        .log_activity(
            user.id,
            "category.create",
            "category",
            Some(category.name.clone()),
            json!({ "name": category.name }),
            &meta,
        )
        .await;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn rename_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    meta: RequestMeta,
    Path(name): Path<String>,
    Json(request): Json<RenameCategoryRequest>,
) -> BackendResult<Json<RenameOutcome>> {
    let outcome =
        service::rename_category(state.store.as_ref(), user.id, &name, &request.new_name).await?;

    state
        .activity
        .log_activity(
            user.id,
            "category.rename",
            "category",
            Some(outcome.category.clone()),
            json!({ "from": name, "to": outcome.category, "documents_updated": outcome.documents_updated }),
            &meta,
        )
        .await;

    Ok(Json(outcome))
}

pub async fn delete_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    meta: RequestMeta,
    Path(name): Path<String>,
) -> BackendResult<Json<DeleteOutcome>> {
    let outcome = service::delete_category(state.store.as_ref(), user.id, &name).await?;

    state
        .activity
        .log_activity(
            user.id,
            "category.delete",
            "category",
            Some(outcome.deleted.clone()),
            json!({ "documents_reassigned": outcome.documents_reassigned }),
            &meta,
        )
        .await;

    Ok(Json(outcome))
}
