/**
 * Session Management and JWT Tokens
 *
 * This module issues and validates the bearer tokens used by the API.
 *
 * Two kinds of token share one secret: short-lived access tokens
 * (`ACCESS_TOKEN_EXPIRE_MINUTES`) and longer refresh tokens
 * (`REFRESH_TOKEN_EXPIRE_DAYS`). Both authenticate requests; the kind is
 * recorded in the `kind` claim for clients and logs.
 */

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::auth::AuthError;
use crate::backend::server::config::Settings;

/// Which lifetime a token was issued with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Access or refresh
    pub kind: TokenKind,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// The user id in `sub`, if it is a valid UUID
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// Creates and verifies tokens with the configured secret and algorithm
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// # Arguments
    ///
    /// * `secret` - HMAC secret
    /// * `algorithm` - One of HS256, HS384, HS512
    /// * `access_ttl` / `refresh_ttl` - Token lifetimes
    pub fn new(secret: &str, algorithm: Algorithm, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            &settings.jwt_secret_key,
            settings.jwt_algorithm,
            Duration::minutes(settings.access_token_expire_minutes),
            Duration::days(settings.refresh_token_expire_days),
        )
    }

    /// Create a token of `kind` for a user
    ///
    /// # Errors
    ///
    /// `AuthError::Token` if encoding fails.
    pub fn issue(&self, user_id: Uuid, email: &str, kind: TokenKind) -> Result<String, AuthError> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            kind,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };
        Ok(encode(&Header::new(self.algorithm), &claims, &self.encoding)?)
    }

    pub fn access_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        self.issue(user_id, email, TokenKind::Access)
    }

    pub fn refresh_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        self.issue(user_id, email, TokenKind::Refresh)
    }

    /// Verify signature, algorithm and expiry and return the claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        Ok(decode::<Claims>(token, &self.decoding, &validation)?.claims)
    }
}

/// Token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
