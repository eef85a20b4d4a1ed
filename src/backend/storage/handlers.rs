/**
 * Signed File Handler
 *
 * `GET {API_V1_STR}/files/{*key}?expires=<unix>&signature=<hex>`
 *
 * Serves objects of the local backend through links minted by
 * `LocalObjectStore::presigned_url`. No bearer token is needed; the link
 * signature is the credential.
 */

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;
use crate::backend::storage::{validate_key, StoredObject};

#[derive(Debug, Deserialize)]
pub struct SignedLinkQuery {
    pub expires: Option<i64>,
    pub signature: Option<String>,
}

/// Build a download response for a stored object
///
/// `attachment_name` adds a `Content-Disposition: attachment` header. The
/// name must already be header-safe.
pub fn object_response(object: StoredObject, attachment_name: Option<&str>) -> Response {
    let content_type = HeaderValue::from_str(&object.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    let mut response = (StatusCode::OK, Body::from(object.body)).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(object.content_length));
    if let Some(name) = attachment_name {
        if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", name)) {
            headers.insert(header::CONTENT_DISPOSITION, value);
        }
    }
    response
}

/// Serve a file behind a signed link
///
/// # Errors
///
/// * `403 Forbidden` - Missing, tampered or expired link
/// * `404 Not Found` - The object no longer exists
pub async fn serve_signed_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<SignedLinkQuery>,
) -> BackendResult<Response> {
    let forbidden = |reason: &str| BackendError::handler(StatusCode::FORBIDDEN, reason);

    let (Some(expires), Some(signature)) = (query.expires, query.signature) else {
        return Err(forbidden("Missing download link signature"));
    };
    validate_key(&key).map_err(|_| forbidden("Invalid download link"))?;

    state
        .link_signer
        .verify(&key, expires, &signature, chrono::Utc::now().timestamp())
        .map_err(|e| {
            tracing::warn!("Rejected download link for {}: {}", key, e);
            forbidden(&e.to_string())
        })?;

    let object = state.objects.get(&key).await?;
    tracing::debug!("Serving {} ({} bytes)", key, object.content_length);
    Ok(object_response(object, None))
}
