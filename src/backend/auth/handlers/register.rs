/**
 * Register Handler
 *
 * `POST /auth/register`
 *
 * # Registration Process
 *
 * 1. Validate email format, field lengths and password length
 * 2. Reject emails that are already registered
 * 3. Hash password using bcrypt (`BCRYPT_COST`)
 * 4. Create the user
 * 5. Return the user without the hash
 */

use axum::{extract::State, Json};

use crate::backend::auth::handlers::types::{RegisterRequest, UserResponse};
use crate::backend::auth::users::{hash_password, validate_registration};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;
use crate::backend::store::{NewUser, StoreError, UserStore};

pub const EMAIL_TAKEN: &str = "Email already registered";

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - Invalid or overlong email, short password, overlong
///   name, or email already registered
/// * `500 Internal Server Error` - Hashing or database failure
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> BackendResult<Json<UserResponse>> {
    let email = request.email.trim().to_string();
    let full_name = request
        .full_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    tracing::info!("Register request for: {}", email);

    validate_registration(&email, &request.password, full_name.as_deref())?;
    if state.store.find_user_by_email(&email).await?.is_some() {
        tracing::warn!("Email already exists: {}", email);
        return Err(BackendError::bad_request(EMAIL_TAKEN));
    }

    let hashed_password = hash_password(&request.password, state.settings.bcrypt_cost)?;

    let user = state
        .store
        .create_user(NewUser {
            email,
            hashed_password,
            full_name,
            ..Default::default()
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => BackendError::bad_request(EMAIL_TAKEN),
            other => other.into(),
        })?;

    tracing::info!("User created successfully: {}", user.id);
    Ok(Json(UserResponse::from(&user)))
}
