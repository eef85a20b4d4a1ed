/**
 * Document Service
 *
 * The document lifecycle against the metadata store and the object store.
 *
 * # Consistency
 *
 * The two stores are not transactional together, so every flow orders its
 * writes to leave no dangling rows:
 *
 * - **create** uploads the blob, then inserts the row. A failed insert
 *   deletes the blob.
 * - **update** validates every field, uploads a replacement blob, then
 *   writes the row. A failed write deletes the new blob. After the commit
 *   the previous blob is deleted; a failure there is only logged.
 * - **delete** removes the row first, then the blob. A failed blob delete
 *   is only logged.
 */

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::categories::service::resolve_category;
use crate::backend::documents::form::{DocumentForm, UploadedFile};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;
use crate::backend::storage::{upload_file, ObjectStore, StoredObject, UploadedObject};
use crate::backend::store::{Document, DocumentFilter, DocumentStore, FolderStore, Store, User};
use crate::shared::category::normalize;
use crate::shared::document::{download_filename, file_extension, validate_name, UploadPolicy};

pub const DOCUMENT_NOT_FOUND: &str = "Document not found";
pub const NO_FILE: &str = "No file associated with this document";
pub const FOLDER_NOT_FOUND: &str = "Folder not found";

/// Sharing information returned by `GET /documents/{id}/share`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareInfo {
    /// Document name with the file extension appended
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub download_url: Option<String>,
    pub metadata: ShareMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareMetadata {
    pub version: i32,
    /// Owner's full name, or email when no name is set
    pub owner: String,
}

/// A document's file ready to be sent to the client
#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub object: StoredObject,
    pub filename: String,
}

/// Document operations for one application instance
#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn Store>,
    objects: Arc<dyn ObjectStore>,
    policy: UploadPolicy,
}

impl DocumentService {
    pub fn new(store: Arc<dyn Store>, objects: Arc<dyn ObjectStore>, policy: UploadPolicy) -> Self {
        Self {
            store,
            objects,
            policy,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.store.clone(),
            state.objects.clone(),
            UploadPolicy {
                max_file_size: state.settings.max_file_size,
            },
        )
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Fetch an owned document
    ///
    /// # Errors
    ///
    /// `404 Not Found` when the document does not exist or belongs to
    /// someone else.
    pub async fn get(&self, owner_id: Uuid, id: Uuid) -> BackendResult<Document> {
        self.store
            .find_document(owner_id, id)
            .await?
            .ok_or_else(|| BackendError::not_found(DOCUMENT_NOT_FOUND))
    }

    /// Owner's documents, newest first
    pub async fn list(
        &self,
        owner_id: Uuid,
        category: Option<&str>,
        folder_id: Option<Uuid>,
    ) -> BackendResult<Vec<Document>> {
        let filter = DocumentFilter {
            category: category.map(normalize).filter(|c| !c.is_empty()),
            folder_id,
        };
        Ok(self.store.list_documents(owner_id, &filter).await?)
    }

    /// Create a document from a submitted form
    ///
    /// # Errors
    ///
    /// * `400 Bad Request` - Invalid name, category, folder or file
    /// * `500 Internal Server Error` - Storage or database failure
    pub async fn create(&self, owner_id: Uuid, form: DocumentForm) -> BackendResult<Document> {
        let name = validate_name(form.name.as_deref().unwrap_or_default())?;
        let category =
            resolve_category(self.store.as_ref(), owner_id, form.category.as_deref().unwrap_or_default())
                .await?;
        let folder_id = self.owned_folder(owner_id, form.folder_id.flatten()).await?;
        let file = form
            .file
            .ok_or_else(|| BackendError::bad_request("No file provided"))?;
        self.policy.check(&file.filename, file.data.len())?;

        let uploaded = self.upload(owner_id, file).await?;

        let now = Utc::now();
        let document = Document {
            id: Uuid::new_v4(),
            name,
            description: clean_description(form.description),
            file_path: Some(uploaded.key.clone()),
            file_size: Some(uploaded.size as i64),
            file_type: Some(uploaded.content_type.clone()),
            category,
            version: 1,
            is_shared: false,
            owner_id,
            folder_id,
            created_at: now,
            modified_at: now,
        };

        match self.store.insert_document(&document).await {
            Ok(document) => {
                tracing::info!("Created document {} for user {}", document.id, owner_id);
                Ok(document)
            }
            Err(e) => {
                tracing::error!("Failed to save document for user {}: {}", owner_id, e);
                self.discard(&uploaded.key).await;
                Err(e.into())
            }
        }
    }

    /// Apply a partial update, optionally replacing the file
    ///
    /// The write only lands if the stored version is still the one that was
    /// read. A replacement file from a losing write is removed again.
    ///
    /// # Errors
    ///
    /// * `404 Not Found` - Unknown document
    /// * `400 Bad Request` - Invalid field; nothing is uploaded in that case
    /// * `409 Conflict` - The file was replaced concurrently
    /// * `500 Internal Server Error` - Storage or database failure
    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        form: DocumentForm,
    ) -> BackendResult<Document> {
        let mut document = self.get(owner_id, id).await?;
        let expected_version = document.version;

        if let Some(name) = form.name.as_deref() {
            document.name = validate_name(name)?;
        }
        if let Some(category) = form.category.as_deref() {
            document.category = resolve_category(self.store.as_ref(), owner_id, category).await?;
        }
        if let Some(folder_id) = form.folder_id {
            document.folder_id = self.owned_folder(owner_id, folder_id).await?;
        }
        if form.description.is_some() {
            document.description = clean_description(form.description);
        }
        if let Some(file) = form.file.as_ref() {
            self.policy.check(&file.filename, file.data.len())?;
        }

        let mut replaced: Option<(Option<String>, String)> = None;
        if let Some(file) = form.file {
            let uploaded = self.upload(owner_id, file).await?;
            replaced = Some((document.file_path.take(), uploaded.key.clone()));
            document.file_path = Some(uploaded.key);
            document.file_size = Some(uploaded.size as i64);
            document.file_type = Some(uploaded.content_type);
            document.version += 1;
        }
        document.modified_at = Utc::now();

        let saved = match self.store.update_document(&document, expected_version).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::error!("Failed to update document {}: {}", id, e);
                if let Some((_, new_key)) = &replaced {
                    self.discard(new_key).await;
                }
                return Err(e.into());
            }
        };

        if let Some((Some(old_key), _)) = &replaced {
            self.discard(old_key).await;
        }

        tracing::info!("Updated document {} (version {})", saved.id, saved.version);
        Ok(saved)
    }

    /// Delete a document and then its file
    ///
    /// Returns the deleted record.
    ///
    /// # Errors
    ///
    /// `404 Not Found` for unknown documents. Failing to delete the file
    /// is not an error.
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> BackendResult<Document> {
        let document = self.get(owner_id, id).await?;

        if !self.store.delete_document(owner_id, id).await? {
            return Err(BackendError::not_found(DOCUMENT_NOT_FOUND));
        }
        if let Some(key) = document.file_path.as_deref() {
            self.discard(key).await;
        }

        tracing::info!("Deleted document {} for user {}", id, owner_id);
        Ok(document)
    }

    /// Read a document's file for download
    ///
    /// # Errors
    ///
    /// * `404 Not Found` - No file recorded, or the object is missing
    pub async fn file(&self, document: &Document) -> BackendResult<DocumentFile> {
        let key = document
            .file_path
            .as_deref()
            .ok_or_else(|| BackendError::not_found(NO_FILE))?;
        let object = self.objects.get(key).await?;
        Ok(DocumentFile {
            object,
            filename: download_filename(&document.name, &file_extension(key)),
        })
    }

    /// Build share information with a time-limited download link
    pub async fn share_info(
        &self,
        owner: &User,
        document: &Document,
        expires_in: Duration,
    ) -> BackendResult<ShareInfo> {
        let (download_url, ext) = match document.file_path.as_deref() {
            Some(key) => (
                Some(self.objects.presigned_url(key, expires_in).await?),
                file_extension(key),
            ),
            None => (None, String::new()),
        };

        Ok(ShareInfo {
            name: format!("{}{}", document.name, ext),
            description: document.description.clone(),
            category: document.category.clone(),
            file_type: document.file_type.clone(),
            file_size: document.file_size,
            created_at: document.created_at,
            modified_at: document.modified_at,
            download_url,
            metadata: ShareMetadata {
                version: document.version,
                owner: owner
                    .full_name
                    .clone()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| owner.email.clone()),
            },
        })
    }

    async fn owned_folder(&self, owner_id: Uuid, folder_id: Option<Uuid>) -> BackendResult<Option<Uuid>> {
        let Some(folder_id) = folder_id else {
            return Ok(None);
        };
        match self.store.find_folder(owner_id, folder_id).await? {
            Some(folder) => Ok(Some(folder.id)),
            None => Err(BackendError::bad_request(FOLDER_NOT_FOUND)),
        }
    }

    async fn upload(&self, owner_id: Uuid, file: UploadedFile) -> BackendResult<UploadedObject> {
        let folder = format!("documents/{}", owner_id);
        upload_file(self.objects.as_ref(), &folder, &file.filename, file.data)
            .await
            .map_err(|e| {
                tracing::error!("Upload failed for user {}: {}", owner_id, e);
                e.into()
            })
    }

    /// Best-effort blob removal
    async fn discard(&self, key: &str) {
        if let Err(e) = self.objects.delete(key).await {
            tracing::warn!("Failed to delete stored file {}: {}", key, e);
        }
    }
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
