/**
 * User Account Operations
 *
 * Password hashing, credential checks and the Google get-or-create flow.
 * Storage goes through `UserStore`, so these functions work against both
 * PostgreSQL and the in-memory store.
 */

use bcrypt::{hash, verify};

use crate::backend::auth::google::GoogleIdentity;
use crate::backend::auth::AuthError;
use crate::backend::store::{NewUser, StoreResult, User, UserStore};
use crate::shared::error::SharedError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Width of `users.email` and `users.full_name`
pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_FULL_NAME_LEN: usize = 255;

/// Hash a password with bcrypt at `cost`
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    Ok(hash(password, cost)?)
}

/// Check a password against a stored hash
///
/// Empty or malformed hashes never match; Google-only accounts have an
/// empty hash.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    if hashed_password.is_empty() {
        return false;
    }
    match verify(password, hashed_password) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!("Password verification error: {:?}", e);
            false
        }
    }
}

/// Minimal address check: `local@domain.tld`
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Check the fields of a registration request
///
/// # Errors
///
/// `ValidationError` for a malformed or overlong email, a short password,
/// or an overlong full name.
pub fn validate_registration(
    email: &str,
    password: &str,
    full_name: Option<&str>,
) -> Result<(), SharedError> {
    SharedError::check_length("email", email, MAX_EMAIL_LEN)?;
    if !is_valid_email(email) {
        return Err(SharedError::validation("email", "Invalid email format"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SharedError::validation(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    if let Some(full_name) = full_name {
        SharedError::check_length("full_name", full_name, MAX_FULL_NAME_LEN)?;
    }
    Ok(())
}

/// Look a user up by email and check the password
///
/// # Returns
///
/// `Some(user)` when the credentials match, `None` otherwise. Whether the
/// account is active is left to the caller.
pub async fn authenticate<S: UserStore + ?Sized>(
    users: &S,
    email: &str,
    password: &str,
) -> StoreResult<Option<User>> {
    let Some(user) = users.find_user_by_email(email).await? else {
        tracing::warn!("Login attempt for unknown email: {}", email);
        return Ok(None);
    };

    if !verify_password(password, &user.hashed_password) {
        tracing::warn!("Invalid password for user: {}", user.id);
        return Ok(None);
    }

    Ok(Some(user))
}

/// Find the account for a Google identity, creating it on first sign-in
///
/// Accounts are matched by Google user id first, then by email. A matched
/// account gets `last_login` updated and, if it was a password account, the
/// Google id attached.
pub async fn get_or_create_google_user<S: UserStore + ?Sized>(
    users: &S,
    identity: &GoogleIdentity,
) -> StoreResult<User> {
    let existing = match users.find_user_by_google_id(&identity.subject).await? {
        Some(user) => Some(user),
        None => users.find_user_by_email(&identity.email).await?,
    };

    if let Some(user) = existing {
        users.touch_last_login(user.id).await?;
        if user.google_user_id.is_none() {
            tracing::info!("Linking Google account to existing user {}", user.id);
            return users
                .link_google_account(user.id, &identity.subject, identity.picture.as_deref())
                .await;
        }
        return Ok(users.find_user_by_id(user.id).await?.unwrap_or(user));
    }

    let user = users
        .create_user(NewUser {
            email: identity.email.clone(),
            hashed_password: String::new(),
            full_name: identity.name.clone(),
            is_google_user: true,
            google_user_id: Some(identity.subject.clone()),
            profile_picture: identity.picture.clone(),
        })
        .await?;
    users.touch_last_login(user.id).await?;
    tracing::info!("Created user {} from Google sign-in", user.id);

    Ok(users.find_user_by_id(user.id).await?.unwrap_or(user))
}
