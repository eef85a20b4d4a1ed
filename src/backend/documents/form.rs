/**
 * Document Multipart Form
 *
 * Reads the `multipart/form-data` body of create and update requests.
 * Fields: `name`, `description`, `category`, `folder_id`, `file`. Unknown
 * fields are ignored. A `folder_id` that is empty or `null` takes the
 * document out of its folder.
 *
 * The file part is read chunk by chunk and rejected as soon as it grows
 * past the upload limit, so oversized uploads are never buffered whole.
 */

use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::shared::document::UploadPolicy;

/// A file part of the form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// Parsed document form; every field is optional at this stage
#[derive(Debug, Clone, Default)]
pub struct DocumentForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// `None` when absent, `Some(None)` to detach from the current folder
    pub folder_id: Option<Option<Uuid>>,
    pub file: Option<UploadedFile>,
}

/// Read a document form
///
/// # Errors
///
/// * `400 Bad Request` - Malformed body, invalid `folder_id`, or a file
///   larger than `policy.max_file_size`
pub async fn read_document_form(
    mut multipart: Multipart,
    policy: &UploadPolicy,
) -> BackendResult<DocumentForm> {
    let mut form = DocumentForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, policy))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => form.name = Some(read_text(field, policy).await?),
            "description" => form.description = Some(read_text(field, policy).await?),
            "category" => form.category = Some(read_text(field, policy).await?),
            "folder_id" => {
                form.folder_id = Some(parse_folder_id(&read_text(field, policy).await?)?)
            }
            "file" => form.file = read_file(field, policy).await?,
            other => tracing::debug!("Ignoring unknown form field: {}", other),
        }
    }

    Ok(form)
}

async fn read_text(field: Field<'_>, policy: &UploadPolicy) -> BackendResult<String> {
    field.text().await.map_err(|e| multipart_error(e, policy))
}

async fn read_file(
    mut field: Field<'_>,
    policy: &UploadPolicy,
) -> BackendResult<Option<UploadedFile>> {
    let filename = field.file_name().unwrap_or_default().to_string();

    let mut data = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, policy))? {
        if data.len() + chunk.len() > policy.max_file_size {
            return Err(policy.too_large().into());
        }
        data.extend_from_slice(&chunk);
    }

    // Browsers send an empty, unnamed part when no file was chosen
    if filename.is_empty() && data.is_empty() {
        return Ok(None);
    }

    Ok(Some(UploadedFile {
        filename,
        data: data.freeze(),
    }))
}

/// `None` for an empty or `null` value
fn parse_folder_id(raw: &str) -> BackendResult<Option<Uuid>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    Uuid::parse_str(raw)
        .map(Some)
        .map_err(|_| BackendError::bad_request("Invalid folder_id"))
}

fn multipart_error(err: MultipartError, policy: &UploadPolicy) -> BackendError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return policy.too_large().into();
    }
    BackendError::bad_request(format!("Invalid form data: {}", err.body_text()))
}
