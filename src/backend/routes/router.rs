/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. `GET /health`
 * 2. Signed file downloads (`{API_V1_STR}/files/{*key}`)
 * 3. API routes nested under `API_V1_STR`
 * 4. Fallback handler (JSON 404)
 *
 * # Layers
 *
 * From the outside in: CORS, request body limit, request logging,
 * analytics tracking.
 */

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

use crate::backend::error::BackendError;
use crate::backend::middleware::{log_requests, track_api_requests};
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::config::Settings;
use crate::backend::server::state::AppState;
use crate::backend::storage::handlers::serve_signed_file;

/// Room for multipart boundaries and the text fields next to the file
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state shared by every handler
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let settings = app_state.settings.clone();

    let api = configure_api_routes(&app_state);

    Router::new()
        .route("/health", get(health))
        .route(
            &format!("{}/{{*key}}", settings.files_route()),
            get(serve_signed_file),
        )
        .nest(&settings.api_prefix(), api)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(&settings))
                .layer(DefaultBodyLimit::max(body_limit(settings.max_file_size)))
                .layer(middleware::from_fn(log_requests))
                .layer(middleware::from_fn_with_state(
                    app_state.clone(),
                    track_api_requests,
                )),
        )
        .with_state(app_state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

async fn not_found() -> impl IntoResponse {
    BackendError::handler(StatusCode::NOT_FOUND, "Not Found")
}

/// Request body cap: the largest allowed file plus form overhead
fn body_limit(max_file_size: usize) -> usize {
    max_file_size.saturating_add(MULTIPART_OVERHEAD)
}

/// Whether a `*` entry in `ALLOWED_ORIGINS` is honoured
///
/// Only in `development`; elsewhere the wildcard is dropped and the
/// remaining origins apply.
fn allows_any_origin(settings: &Settings) -> bool {
    settings.is_development() && settings.allowed_origins.iter().any(|o| o == "*")
}

/// CORS for the configured origins
///
/// Credentials are allowed, so methods and headers mirror the request
/// instead of using a wildcard. A `*` origin disables credentials.
fn cors_layer(settings: &Settings) -> CorsLayer {
    if allows_any_origin(settings) {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter(|origin| {
            if origin.as_str() == "*" {
                tracing::warn!(
                    "Ignoring wildcard CORS origin outside development ({})",
                    settings.environment
                );
                return false;
            }
            true
        })
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
