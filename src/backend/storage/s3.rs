/**
 * S3 Object Store
 *
 * Talks to Amazon S3 (or any S3-compatible endpoint such as MinIO) through
 * `aws-sdk-s3`. Credentials from the settings take precedence; without
 * them the default AWS provider chain (environment, profile, instance
 * role) is used. A custom `S3_ENDPOINT` switches to path-style addressing.
 *
 * When `debug_operations` is on, every object request is logged at info
 * level.
 */

use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

use crate::backend::storage::{validate_key, ObjectStore, StorageError, StorageResult, StoredObject};

const CREDENTIALS_SOURCE: &str = "docnest-settings";

/// Connection settings for an S3 bucket
#[derive(Debug, Clone, Default)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    /// Custom endpoint (scheme + host[:port]); switches to path-style URLs
    pub endpoint: Option<String>,
    pub debug_operations: bool,
}

/// S3-backed object store
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    debug_operations: bool,
}

impl S3ObjectStore {
    /// Build the SDK client for `config`
    ///
    /// # Errors
    ///
    /// `StorageError::Config` when no bucket is configured. Nothing is sent
    /// to S3 here; use [`ObjectStore::verify_access`] for that.
    pub async fn connect(config: S3Config) -> StorageResult<Self> {
        if config.bucket.trim().is_empty() {
            return Err(StorageError::Config("AWS_BUCKET_NAME is not set".to_string()));
        }

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
        if let (Some(access_key_id), Some(secret_access_key)) =
            (config.access_key_id.clone(), config.secret_access_key.clone())
        {
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                config.session_token.clone(),
                None,
                CREDENTIALS_SOURCE,
            ));
        }
        if let Some(endpoint) = config.endpoint.as_deref() {
            loader = loader.endpoint_url(endpoint.trim_end_matches('/'));
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint.is_some())
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket,
            debug_operations: config.debug_operations,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn trace(&self, operation: &str, key: &str) {
        if self.debug_operations {
            tracing::info!("S3 {} s3://{}/{}", operation, self.bucket, key);
        }
    }
}

/// Flatten an SDK failure into `StorageError::Remote`
fn remote_error<E>(err: &SdkError<E, HttpResponse>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    StorageError::Remote {
        status: err.raw_response().map(|r| r.status().as_u16()).unwrap_or_default(),
        code: err.code().unwrap_or("Unknown").to_string(),
        message: err
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| DisplayErrorContext(err).to_string()),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.trace("PUT", key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                let err = remote_error(&e);
                tracing::error!("Error uploading {} to S3: {}", key, err);
                err
            })?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<StoredObject> {
        validate_key(key)?;
        self.trace("GET", key);

        let output = match self.client.get_object().bucket(&self.bucket).key(key).send().await {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|s| s.is_no_such_key()) => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(remote_error(&e)),
        };

        let content_type = output
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Remote {
                status: 0,
                code: "BodyRead".to_string(),
                message: e.to_string(),
            })?
            .into_bytes();

        Ok(StoredObject {
            content_length: body.len() as u64,
            content_type,
            body,
        })
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.trace("DELETE", key);

        match self.client.delete_object().bucket(&self.bucket).key(key).send().await {
            Ok(_) => Ok(()),
            Err(e) if e.code() == Some("NoSuchKey") => Ok(()),
            Err(e) => Err(remote_error(&e)),
        }
    }

    async fn presigned_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        validate_key(key)?;

        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::Config(format!("Invalid link expiry: {}", e)))?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| remote_error(&e))?;
        Ok(request.uri().to_string())
    }

    async fn verify_access(&self) -> StorageResult<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| remote_error(&e))?;
        tracing::info!("Successfully connected to S3 bucket: {}", self.bucket);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
