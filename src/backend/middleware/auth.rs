/**
 * Authentication Middleware
 *
 * This module protects routes that require a signed-in user. It reads the
 * bearer token from the `Authorization` header, verifies it, loads the user
 * and makes them available to handlers.
 *
 * # Failure Modes
 *
 * - Missing header, bad token, unknown user → 401 `Could not validate credentials`
 * - User exists but is deactivated → 400 `Inactive user account`
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::backend::auth::sessions::bearer_token;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::backend::store::{User, UserStore};

pub const INVALID_CREDENTIALS: &str = "Could not validate credentials";
pub const INACTIVE_USER: &str = "Inactive user account";

/// Authenticated user attached to the request by the middleware
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user: User,
}

/// Resolve the user behind the request's bearer token
pub async fn authenticate_headers(state: &AppState, headers: &HeaderMap) -> Result<User, BackendError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| {
            tracing::debug!("Missing or malformed Authorization header");
            BackendError::unauthorized(INVALID_CREDENTIALS)
        })?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::warn!("Invalid token: {}", e);
        BackendError::unauthorized(INVALID_CREDENTIALS)
    })?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| BackendError::unauthorized(INVALID_CREDENTIALS))?;

    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for unknown user {}", user_id);
            BackendError::unauthorized(INVALID_CREDENTIALS)
        })?;

    if !user.is_active {
        return Err(BackendError::bad_request(INACTIVE_USER));
    }

    Ok(user)
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the bearer token from the Authorization header
/// 2. Verifies the token and loads the user
/// 3. Attaches `AuthenticatedUser` to request extensions for handlers
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let user = authenticate_headers(&app_state, request.headers()).await?;
    request.extensions_mut().insert(AuthenticatedUser { user });
    Ok(next.run(request).await)
}

/// Axum extractor for the signed-in user
///
/// Uses the user attached by `auth_middleware` when present and
/// authenticates the request itself otherwise.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(AuthenticatedUser { user }) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(CurrentUser(user.clone()));
        }
        authenticate_headers(state, &parts.headers).await.map(CurrentUser)
    }
}
