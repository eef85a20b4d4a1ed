/**
 * Filesystem Object Store
 *
 * Stores objects as plain files below a root directory, mirroring the key
 * as a relative path. Presigned URLs point back at this server's
 * `{API_V1_STR}/files/{key}` route and are authenticated by `LinkSigner`.
 */

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::backend::storage::signing::LinkSigner;
use crate::backend::storage::{
    sniff, validate_key, ObjectStore, StorageError, StorageResult, StoredObject,
};

/// Object store rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    signer: LinkSigner,
    files_url: String,
}

impl LocalObjectStore {
    /// # Arguments
    ///
    /// * `root` - Directory that holds the objects (created on demand)
    /// * `signer` - Signs download links
    /// * `files_url` - Absolute URL of the signed download route, see
    ///   `Settings::files_url`
    pub fn new(root: impl AsRef<Path>, signer: LinkSigner, files_url: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            signer,
            files_url: files_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(key.split('/').fold(self.root.clone(), |path, segment| path.join(segment)))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, body: Bytes, _content_type: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &body).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<StoredObject> {
        let path = self.path_for(key)?;
        let body = match tokio::fs::read(&path).await {
            Ok(body) => Bytes::from(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(StoredObject {
            content_type: sniff::detect_content_type(&body).to_string(),
            content_length: body.len() as u64,
            body,
        })
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn presigned_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        validate_key(key)?;
        let expires = chrono::Utc::now().timestamp() + expires_in.as_secs() as i64;
        let signature = self.signer.sign(key, expires);
        let encoded_key = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        Ok(format!(
            "{}/{}?expires={}&signature={}",
            self.files_url, encoded_key, expires, signature
        ))
    }

    async fn verify_access(&self) -> StorageResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        let marker = self.root.join(".docnest-write-check");
        tokio::fs::write(&marker, b"ok").await?;
        tokio::fs::remove_file(&marker).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
