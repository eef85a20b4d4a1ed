/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including store selection, object storage setup, and route configuration.
 *
 * # Initialization Process
 *
 * 1. Connect to PostgreSQL and run migrations, or fall back to the
 *    in-memory store
 * 2. Build the configured object store (local directory or S3)
 * 3. Check that the object store is reachable
 * 4. Assemble `AppState` and the router
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, Settings, StorageBackend};
use crate::backend::server::state::{AppState, AppStateBuilder};
use crate::backend::storage::s3::S3Config;
use crate::backend::storage::{LocalObjectStore, ObjectStore, S3ObjectStore, StorageResult};
use crate::backend::store::{MemoryStore, PgStore, Store};

/// Create and configure the Axum application
///
/// # Arguments
///
/// * `settings` - Loaded server settings
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
///
/// # Errors
///
/// Fails only when the S3 backend cannot be constructed from the settings.
/// A missing database or an unreachable object store is logged and the
/// server starts anyway.
pub async fn create_app(settings: Settings) -> StorageResult<Router<()>> {
    tracing::info!("Initializing {} backend server", settings.project_name);

    let app_state = build_state(settings).await?;
    let app = create_router(app_state);

    tracing::info!("Router configured");
    Ok(app)
}

/// Build the application state from settings
pub async fn build_state(settings: Settings) -> StorageResult<AppState> {
    let store: Arc<dyn Store> = match load_database(&settings).await {
        Some(pool) => Arc::new(PgStore::new(pool)),
        None => {
            tracing::warn!("Using the in-memory store; data will be lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let objects = object_store(&settings).await?;
    match objects.verify_access().await {
        Ok(()) => tracing::info!("{} object storage is accessible", objects.backend_name()),
        Err(e) => tracing::error!(
            "{} object storage is not accessible: {}",
            objects.backend_name(),
            e
        ),
    }

    Ok(AppState::builder(settings)
        .store(store)
        .objects(objects)
        .build())
}

/// Build the object store selected by `STORAGE_BACKEND`
pub async fn object_store(settings: &Settings) -> StorageResult<Arc<dyn ObjectStore>> {
    match settings.storage_backend {
        StorageBackend::Local => {
            tracing::info!("Storing files below {}", settings.upload_dir);
            Ok(Arc::new(LocalObjectStore::new(
                &settings.upload_dir,
                AppStateBuilder::link_signer(settings),
                &settings.files_url(),
            )))
        }
        StorageBackend::S3 => {
            let store = S3ObjectStore::connect(S3Config {
                bucket: settings.aws_bucket_name.clone().unwrap_or_default(),
                region: settings.aws_region.clone(),
                access_key_id: settings.aws_access_key_id.clone(),
                secret_access_key: settings.aws_secret_access_key.clone(),
                session_token: settings.aws_session_token.clone(),
                endpoint: settings.s3_endpoint.clone(),
                debug_operations: settings.debug_s3_operations,
            })
            .await?;
            tracing::info!("Storing files in S3 bucket {}", store.bucket());
            Ok(Arc::new(store))
        }
    }
}
