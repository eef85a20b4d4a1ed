/**
 * Authentication Handler Types
 *
 * Request and response bodies of the `/auth` endpoints.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::store::User;

/// Token type reported to OAuth2 clients
pub const BEARER: &str = "bearer";

/// Registration request
#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    /// At least 8 characters; hashed before storage
    pub password: String,
    pub full_name: Option<String>,
}

/// OAuth2 password-grant form (`username` carries the email)
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Tokens returned by login and refresh
#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub refresh_token: Option<String>,
    pub token_type: String,
}

/// Google sign-in request carrying the client's ID token
#[derive(Deserialize, Serialize, Debug)]
pub struct GoogleSignInRequest {
    pub token: String,
}

/// Google sign-in response
#[derive(Serialize, Deserialize, Debug)]
pub struct GoogleSignInResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserResponse,
}

/// Plain `{"message": ...}` body
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

/// User response (without sensitive data)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_google_user: bool,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_active: user.is_active,
            is_google_user: user.is_google_user,
            profile_picture: user.profile_picture.clone(),
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}
