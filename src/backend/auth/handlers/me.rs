/**
 * Get Current User Handler
 *
 * `GET /auth/me` returns the authenticated user without sensitive data.
 */

use axum::Json;

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::middleware::CurrentUser;

pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}
