/**
 * API Route Handlers
 *
 * Routes below the API prefix (`API_V1_STR`, `/api/v1` by default).
 *
 * # Routes
 *
 * ## Authentication (public)
 * - `POST /auth/register` - User registration
 * - `POST /auth/login` - OAuth2 password login
 * - `POST /auth/google/signin` - Google ID token sign-in
 *
 * ## Authentication (bearer token)
 * - `GET /auth/me` - Current user
 * - `POST /auth/refresh` - New access token
 * - `POST /auth/logout` - Logout
 *
 * ## Documents
 * - `POST|GET /documents` (also with a trailing slash)
 * - `GET|PUT|DELETE /documents/{id}`
 * - `GET /documents/{id}/download`
 * - `GET /documents/{id}/share`
 *
 * ## Categories
 * - `GET|POST /categories`
 * - `PUT|DELETE /categories/{name}`
 *
 * ## Folders
 * - `GET|POST /folders`
 * - `GET|DELETE /folders/{id}`
 *
 * ## Analytics
 * - `GET|POST /analytics/events`
 * - `GET /analytics/logs`
 * - `GET /analytics/summary`
 */

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::backend::analytics;
use crate::backend::auth::{google_signin, login, logout, me, refresh, register};
use crate::backend::categories;
use crate::backend::documents;
use crate::backend::folders;
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// # Arguments
///
/// * `app_state` - Needed by the authentication route layer
///
/// # Returns
///
/// Router with public and protected API routes, not yet nested under the
/// API prefix
///
/// # Authentication
///
/// Every route except register, login and Google sign-in runs behind
/// `auth_middleware`, which rejects requests without a valid bearer token
/// before the handler is reached.
pub fn configure_api_routes(app_state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/google/signin", post(google_signin));

    let protected = Router::new()
        .route("/auth/me", get(me))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .merge(document_routes())
        .merge(category_routes())
        .merge(folder_routes())
        .merge(analytics_routes())
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    public.merge(protected)
}

fn document_routes() -> Router<AppState> {
    use documents::{
        create_document, delete_document, download_document, get_document, list_documents,
        share_document, update_document,
    };

    Router::new()
        .route("/documents", post(create_document).get(list_documents))
        .route("/documents/", post(create_document).get(list_documents))
        .route(
            "/documents/{id}",
            get(get_document).put(update_document).delete(delete_document),
        )
        .route("/documents/{id}/download", get(download_document))
        .route("/documents/{id}/share", get(share_document))
}

fn category_routes() -> Router<AppState> {
    use categories::{create_category, delete_category, list_categories, rename_category};

    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{name}",
            put(rename_category).delete(delete_category),
        )
}

fn folder_routes() -> Router<AppState> {
    use folders::{create_folder, delete_folder, get_folder, list_folders};

    Router::new()
        .route("/folders", get(list_folders).post(create_folder))
        .route("/folders/{id}", get(get_folder).delete(delete_folder))
}

fn analytics_routes() -> Router<AppState> {
    use analytics::{list_activity_logs, list_events, summary, track_event};

    Router::new()
        .route("/analytics/events", post(track_event).get(list_events))
        .route("/analytics/logs", get(list_activity_logs))
        .route("/analytics/summary", get(summary))
}
