/**
 * Session Handlers
 *
 * - `POST /auth/refresh` - exchange a valid token for a fresh access token
 * - `POST /auth/logout` - record the logout time
 *
 * Tokens are stateless, so logout does not revoke anything; clients drop
 * their tokens.
 */

use axum::{extract::State, Json};

use crate::backend::auth::handlers::types::{MessageResponse, TokenResponse, BEARER};
use crate::backend::error::BackendResult;
use crate::backend::middleware::CurrentUser;
use crate::backend::server::state::AppState;
use crate::backend::store::UserStore;

pub async fn refresh(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> BackendResult<Json<TokenResponse>> {
    let access_token = state.tokens.access_token(user.id, &user.email)?;
    Ok(Json(TokenResponse {
        access_token,
        refresh_token: None,
        token_type: BEARER.to_string(),
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> BackendResult<Json<MessageResponse>> {
    state.store.touch_last_login(user.id).await?;
    tracing::info!("User logged out: {}", user.id);
    Ok(Json(MessageResponse {
        message: "Successfully logged out".to_string(),
    }))
}
