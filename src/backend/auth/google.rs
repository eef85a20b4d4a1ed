/**
 * Google ID Token Verification
 *
 * Clients obtain an ID token from Google Sign-In and post it to
 * `/auth/google/signin`. The token is checked with Google's `tokeninfo`
 * endpoint, which validates signature and expiry; the audience and issuer
 * are checked here.
 */

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::backend::auth::AuthError;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Issuers Google uses for ID tokens
pub const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Identity asserted by a verified Google ID token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleIdentity {
    /// Google's stable user id (`sub`)
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Verifies Google ID tokens
#[async_trait]
pub trait IdTokenVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, AuthError>;
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    iss: Option<String>,
    aud: Option<String>,
    sub: Option<String>,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
    error_description: Option<String>,
}

/// Check the claims Google returned against our client id
fn identity_from_token_info(info: TokenInfo, client_id: &str) -> Result<GoogleIdentity, AuthError> {
    if info.aud.as_deref() != Some(client_id) {
        return Err(AuthError::Google("Token has wrong audience".to_string()));
    }
    match info.iss.as_deref() {
        Some(iss) if GOOGLE_ISSUERS.contains(&iss) => {}
        _ => return Err(AuthError::Google("Wrong issuer.".to_string())),
    }
    let subject = info
        .sub
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AuthError::Google("Token has no subject".to_string()))?;
    let email = info
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AuthError::Google("Token has no email".to_string()))?;

    Ok(GoogleIdentity {
        subject,
        email,
        name: info.name,
        picture: info.picture,
    })
}

/// `IdTokenVerifier` backed by Google's tokeninfo endpoint
#[derive(Debug, Clone)]
pub struct GoogleTokenVerifier {
    client: Client,
    client_id: Option<String>,
}

impl GoogleTokenVerifier {
    /// `client_id` is `GOOGLE_CLIENT_ID`; without it every token is rejected
    pub fn new(client_id: Option<String>) -> Self {
        Self {
            client: Client::new(),
            client_id,
        }
    }
}

#[async_trait]
impl IdTokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, AuthError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| AuthError::Google("Google sign-in is not configured".to_string()))?;

        let response = self
            .client
            .get(TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| AuthError::Google(format!("Token verification request failed: {}", e)))?;

        let status = response.status();
        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| AuthError::Google(format!("Unexpected tokeninfo response: {}", e)))?;

        if !status.is_success() {
            return Err(AuthError::Google(
                info.error_description
                    .unwrap_or_else(|| "Invalid Value".to_string()),
            ));
        }

        identity_from_token_info(info, client_id)
    }
}
