//! Authentication API tests
//!
//! Tests for:
//! - Registration and its validation errors
//! - Password login (OAuth2 form)
//! - Bearer-protected endpoints
//! - Google sign-in
//! - Token refresh and logout

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::*;

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/auth/register")
        .json(&json!({
            "email": "alice@example.com",
            "password": "password123",
            "full_name": "Alice"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["full_name"], "Alice");
    assert_eq!(body["is_active"], true);
    assert_eq!(body["is_google_user"], false);
    assert!(body.get("hashed_password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new();
    create_test_user(&app.server, "dup@example.com", "password123").await;

    let response = app
        .server
        .post("/api/v1/auth/register")
        .json(&json!({ "email": "dup@example.com", "password": "another-password" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/auth/register")
        .json(&json!({ "email": "short@example.com", "password": "1234567" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Password must be at least 8 characters");
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/auth/register")
        .json(&json!({ "email": "not-an-email", "password": "password123" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_overlong_fields() {
    let app = TestApp::new();
    let long_email = format!("{}@example.com", "a".repeat(250));

    let response = app
        .server
        .post("/api/v1/auth/register")
        .json(&json!({ "email": long_email, "password": "password123" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "email must be at most 255 characters"
    );

    let response = app
        .server
        .post("/api/v1/auth/register")
        .json(&json!({
            "email": "longname@example.com",
            "password": "password123",
            "full_name": "n".repeat(256)
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "full_name must be at most 255 characters"
    );

    // Nothing was stored
    app.server
        .post("/api/v1/auth/register")
        .json(&json!({ "email": "longname@example.com", "password": "password123" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_login_returns_tokens() {
    let app = TestApp::new();
    create_test_user(&app.server, "login@example.com", "password123").await;

    let body = login(&app.server, "login@example.com", "password123").await;

    assert_eq!(body["token_type"], "bearer");
    assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["refresh_token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    create_test_user(&app.server, "wrong@example.com", "password123").await;

    let response = app
        .server
        .post("/api/v1/auth/login")
        .form(&[("username", "wrong@example.com"), ("password", "bad-password")])
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("www-authenticate"), "Bearer");
    let body: Value = response.json();
    assert_eq!(body["error"], "Incorrect username or password");
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/auth/login")
        .form(&[("username", "nobody@example.com"), ("password", "password123")])
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new();

    let response = app.server.get("/api/v1/auth/me").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("www-authenticate"), "Bearer");
}

#[tokio::test]
async fn test_me_rejects_garbage_token() {
    let app = TestApp::new();

    let response = app
        .server
        .get("/api/v1/auth/me")
        .add_header("Authorization", bearer("not-a-jwt"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;

    let response = app
        .server
        .get("/api/v1/auth/me")
        .add_header("Authorization", bearer(&user.token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], user.id.as_str());
    assert_eq!(body["email"], user.email.as_str());
    assert!(!body["last_login"].is_null());
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    let tokens = login(&app.server, &user.email, &user.password).await;
    let refresh_token = tokens["refresh_token"].as_str().unwrap();

    let response = app
        .server
        .post("/api/v1/auth/refresh")
        .add_header("Authorization", bearer(refresh_token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let access_token = body["access_token"].as_str().unwrap();
    assert!(body.get("refresh_token").is_none());

    app.server
        .get("/api/v1/auth/me")
        .add_header("Authorization", bearer(access_token))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_logout() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;

    let response = app
        .server
        .post("/api/v1/auth/logout")
        .add_header("Authorization", bearer(&user.token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Successfully logged out");
}

#[tokio::test]
async fn test_google_signin_creates_user() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/auth/google/signin")
        .json(&json!({ "token": VALID_GOOGLE_TOKEN }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["user"]["email"], "google.user@example.com");
    assert_eq!(body["user"]["is_google_user"], true);
    assert_eq!(body["user"]["profile_picture"], "https://example.com/avatar.png");

    let token = body["access_token"].as_str().unwrap();
    app.server
        .get("/api/v1/auth/me")
        .add_header("Authorization", bearer(token))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_google_signin_is_idempotent() {
    let app = TestApp::new();

    let first: Value = app
        .server
        .post("/api/v1/auth/google/signin")
        .json(&json!({ "token": VALID_GOOGLE_TOKEN }))
        .await
        .json();
    let second: Value = app
        .server
        .post("/api/v1/auth/google/signin")
        .json(&json!({ "token": VALID_GOOGLE_TOKEN }))
        .await
        .json();

    assert_eq!(first["user"]["id"], second["user"]["id"]);
}

#[tokio::test]
async fn test_google_signin_links_existing_account() {
    let app = TestApp::new();
    let user = create_test_user(&app.server, "google.user@example.com", "password123").await;

    let response = app
        .server
        .post("/api/v1/auth/google/signin")
        .json(&json!({ "token": VALID_GOOGLE_TOKEN }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["id"], user.id.as_str());
    assert_eq!(body["user"]["is_google_user"], true);

    // The password keeps working after linking
    login(&app.server, "google.user@example.com", "password123").await;
}

#[tokio::test]
async fn test_google_signin_invalid_token() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/auth/google/signin")
        .json(&json!({ "token": "forged" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Could not validate Google credentials"));
}
