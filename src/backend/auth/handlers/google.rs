/**
 * Google Sign-In Handler
 *
 * `POST /auth/google/signin` with `{"token": "<google id token>"}`.
 *
 * The token is verified with Google, the matching account is found or
 * created, and an access token is returned together with the user. Any
 * failure along the way is a 401.
 */

use axum::{extract::State, Json};

use crate::backend::auth::handlers::types::{
    GoogleSignInRequest, GoogleSignInResponse, UserResponse, BEARER,
};
use crate::backend::auth::users::get_or_create_google_user;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;

fn rejected(reason: impl std::fmt::Display) -> BackendError {
    BackendError::unauthorized(format!("Could not validate Google credentials: {}", reason))
}

pub async fn google_signin(
    State(state): State<AppState>,
    Json(request): Json<GoogleSignInRequest>,
) -> BackendResult<Json<GoogleSignInResponse>> {
    let identity = state.google.verify(&request.token).await.map_err(|e| {
        tracing::warn!("Google token rejected: {}", e);
        rejected(e)
    })?;

    let user = get_or_create_google_user(state.store.as_ref(), &identity)
        .await
        .map_err(|e| {
            tracing::error!("Google sign-in failed for {}: {}", identity.email, e);
            rejected(e)
        })?;

    let access_token = state.tokens.access_token(user.id, &user.email).map_err(rejected)?;

    tracing::info!("Google sign-in for user {}", user.id);
    Ok(Json(GoogleSignInResponse {
        access_token,
        token_type: BEARER.to_string(),
        user: UserResponse::from(&user),
    }))
}
