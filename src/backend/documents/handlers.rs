/**
 * Document Handlers
 *
 * - `POST /documents` - multipart upload
 * - `GET /documents` - list, optionally by `category` / `folder_id`
 * - `GET /documents/{id}` - metadata
 * - `PUT /documents/{id}` - multipart partial update
 * - `DELETE /documents/{id}` - 204
 * - `GET /documents/{id}/download` - file as an attachment
 * - `GET /documents/{id}/share` - share info with a time-limited link
 *
 * Every handler records an activity entry after the operation succeeds.
 */

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::backend::activity::RequestMeta;
use crate::backend::documents::form::read_document_form;
use crate::backend::documents::service::{DocumentService, ShareInfo};
use crate::backend::error::BackendResult;
use crate::backend::middleware::CurrentUser;
use crate::backend::server::state::AppState;
use crate::backend::storage::handlers::object_response;
use crate::backend::store::Document;

const RESOURCE: &str = "document";

#[derive(Debug, Default, Deserialize)]
pub struct ListDocumentsQuery {
    pub category: Option<String>,
    pub folder_id: Option<Uuid>,
}

pub async fn create_document(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    meta: RequestMeta,
    multipart: Multipart,
) -> BackendResult<(StatusCode, Json<Document>)> {
    let service = DocumentService::from_state(&state);
    let form = read_document_form(multipart, service.policy()).await?;
    let document = service.create(user.id, form).await?;

    state
        .activity
        .log_activity(
            user.id,
            "document.create",
            RESOURCE,
            Some(document.id.to_string()),
            json!({
                "name": document.name,
                "category": document.category,
                "file_size": document.file_size,
                "file_type": document.file_type,
            }),
            &meta,
        )
        .await;

    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn list_documents(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListDocumentsQuery>,
) -> BackendResult<Json<Vec<Document>>> {
    let documents = DocumentService::from_state(&state)
        .list(user.id, query.category.as_deref(), query.folder_id)
        .await?;
    Ok(Json(documents))
}

pub async fn get_document(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    meta: RequestMeta,
    Path(id): Path<Uuid>,
) -> BackendResult<Json<Document>> {
    let document = DocumentService::from_state(&state).get(user.id, id).await?;

    state
        .activity
        .log_activity(
            user.id,
            "document.view",
            RESOURCE,
            Some(id.to_string()),
            json!({ "name": document.name }),
            &meta,
        )
        .await;

    Ok(Json(document))
}

pub async fn update_document(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    meta: RequestMeta,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> BackendResult<Json<Document>> {
    let service = DocumentService::from_state(&state);
    let form = read_document_form(multipart, service.policy()).await?;

    let mut changed: Vec<&str> = Vec::new();
    for (field, present) in [
        ("name", form.name.is_some()),
        ("description", form.description.is_some()),
        ("category", form.category.is_some()),
        ("folder_id", form.folder_id.is_some()),
        ("file", form.file.is_some()),
    ] {
        if present {
            changed.push(field);
        }
    }

    let document = service.update(user.id, id, form).await?;

    state
        .activity
        .log_activity(
            user.id,
            "document.update",
            RESOURCE,
            Some(id.to_string()),
            json!({ "updated_fields": changed, "version": document.version }),
            &meta,
        )
        .await;

    Ok(Json(document))
}

pub async fn delete_document(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    meta: RequestMeta,
    Path(id): Path<Uuid>,
) -> BackendResult<StatusCode> {
    let document = DocumentService::from_state(&state).delete(user.id, id).await?;

    state
        .activity
        .log_activity(
            user.id,
            "document.delete",
            RESOURCE,
            Some(id.to_string()),
            json!({ "name": document.name }),
            &meta,
        )
        .await;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn download_document(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    meta: RequestMeta,
    Path(id): Path<Uuid>,
) -> BackendResult<Response> {
    let service = DocumentService::from_state(&state);
    let document = service.get(user.id, id).await?;
    let file = service.file(&document).await?;

    state
        .activity
        .log_activity(
            user.id,
            "document.download",
            RESOURCE,
            Some(id.to_string()),
            json!({ "filename": file.filename, "file_size": file.object.content_length }),
            &meta,
        )
        .await;

    Ok(object_response(file.object, Some(&file.filename)))
}

pub async fn share_document(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    meta: RequestMeta,
    Path(id): Path<Uuid>,
) -> BackendResult<Json<ShareInfo>> {
    let service = DocumentService::from_state(&state);
    let document = service.get(user.id, id).await?;
    let share = service
        .share_info(&user, &document, state.settings.share_link_ttl())
        .await?;

    state
        .activity
        .log_activity(
            user.id,
            "document.share",
            RESOURCE,
            Some(id.to_string()),
            json!({ "expires_in": state.settings.share_link_expires_secs }),
            &meta,
        )
        .await;

    Ok(Json(share))
}
