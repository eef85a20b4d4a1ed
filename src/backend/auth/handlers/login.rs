/**
 * Login Handler
 *
 * `POST /auth/login` with an OAuth2 password form
 * (`application/x-www-form-urlencoded`, `username` = email).
 *
 * # Authentication Process
 *
 * 1. Look up user by email and verify the password with bcrypt
 * 2. Reject inactive accounts
 * 3. Update `last_login`
 * 4. Return access and refresh tokens
 *
 * Unknown email and wrong password produce the same 401.
 */

use axum::{extract::State, Form, Json};

use crate::backend::auth::handlers::types::{LoginForm, TokenResponse, BEARER};
use crate::backend::auth::users::authenticate;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::auth::INACTIVE_USER;
use crate::backend::server::state::AppState;
use crate::backend::store::UserStore;

pub const BAD_CREDENTIALS: &str = "Incorrect username or password";

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - Unknown user or wrong password
/// * `400 Bad Request` - Account is inactive
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> BackendResult<Json<TokenResponse>> {
    let email = form.username.trim();
    tracing::info!("Login request for: {}", email);

    let user = authenticate(state.store.as_ref(), email, &form.password)
        .await?
        .ok_or_else(|| BackendError::unauthorized(BAD_CREDENTIALS))?;

    if !user.is_active {
        return Err(BackendError::bad_request(INACTIVE_USER));
    }

    state.store.touch_last_login(user.id).await?;

    let access_token = state.tokens.access_token(user.id, &user.email)?;
    let refresh_token = state.tokens.refresh_token(user.id, &user.email)?;

    tracing::info!("User logged in successfully: {}", user.id);
    Ok(Json(TokenResponse {
        access_token,
        refresh_token: Some(refresh_token),
        token_type: BEARER.to_string(),
    }))
}
