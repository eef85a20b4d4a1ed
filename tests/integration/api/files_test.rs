//! Share link and signed file download tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::*;

/// Upload a document and return `(document, share info)`
async fn shared_document(app: &TestApp, user: &TestUser) -> (Value, Value) {
    let doc: Value = app
        .server
        .post("/api/v1/documents/")
        .add_header("Authorization", bearer(&user.token))
        .multipart(document_form("Contract", "OTHER", "contract.pdf", PDF_BYTES))
        .await
        .json();

    let response = app
        .server
        .get(&format!("/api/v1/documents/{}/share", doc["id"].as_str().unwrap()))
        .add_header("Authorization", bearer(&user.token))
        .await;
    response.assert_status_ok();
    (doc, response.json())
}

/// The path and query of a link issued for `http://localhost`
fn local_path(url: &str) -> &str {
    url.strip_prefix("http://localhost").expect("link on the public base URL")
}

#[tokio::test]
async fn test_share_info() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;

    let (_, share) = shared_document(&app, &user).await;

    assert_eq!(share["name"], "Contract.pdf");
    assert_eq!(share["category"], "OTHER");
    assert_eq!(share["file_type"], "application/pdf");
    assert_eq!(share["metadata"]["version"], 1);
    assert_eq!(share["metadata"]["owner"], "Test User");
    let url = share["download_url"].as_str().unwrap();
    assert!(url.starts_with("http://localhost/api/v1/files/documents/"));
    assert!(url.contains("expires="));
    assert!(url.contains("signature="));
}

#[tokio::test]
async fn test_signed_link_serves_file_without_auth() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    let (_, share) = shared_document(&app, &user).await;

    let response = app
        .server
        .get(local_path(share["download_url"].as_str().unwrap()))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/pdf");
    assert_eq!(response.as_bytes().as_ref(), PDF_BYTES);
}

#[tokio::test]
async fn test_tampered_signature_is_forbidden() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    let (_, share) = shared_document(&app, &user).await;
    let url = local_path(share["download_url"].as_str().unwrap());

    let (head, signature) = url.rsplit_once("signature=").unwrap();
    let flipped = if signature.starts_with('0') { "1" } else { "0" };
    let tampered = format!("{}signature={}{}", head, flipped, &signature[1..]);

    app.server
        .get(&tampered)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_link_for_other_key_is_forbidden() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    let (_, first) = shared_document(&app, &user).await;
    let (_, second) = shared_document(&app, &user).await;

    // First document's path with the second document's query string
    let (first_path, _) = local_path(first["download_url"].as_str().unwrap())
        .split_once('?')
        .unwrap();
    let (_, second_query) = local_path(second["download_url"].as_str().unwrap())
        .split_once('?')
        .unwrap();

    app.server
        .get(&format!("{}?{}", first_path, second_query))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_expired_link_is_forbidden() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    let (doc, _) = shared_document(&app, &user).await;
    let key = doc["file_path"].as_str().unwrap();

    let expires = chrono::Utc::now().timestamp() - 60;
    let signature = app.state.link_signer.sign(key, expires);

    app.server
        .get(&format!("/api/v1/files/{}", key))
        .add_query_param("expires", expires)
        .add_query_param("signature", signature)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unsigned_link_is_forbidden() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    let (doc, _) = shared_document(&app, &user).await;

    app.server
        .get(&format!("/api/v1/files/{}", doc["file_path"].as_str().unwrap()))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_download_links_follow_api_prefix() {
    let app = TestApp::with_settings(|settings| settings.api_v1_str = "/api/v2".to_string());
    app.server
        .post("/api/v2/auth/register")
        .json(&json!({ "email": "prefix@example.com", "password": "password123" }))
        .await
        .assert_status_ok();
    let tokens: Value = app
        .server
        .post("/api/v2/auth/login")
        .form(&[("username", "prefix@example.com"), ("password", "password123")])
        .await
        .json();
    let token = tokens["access_token"].as_str().unwrap().to_string();

    let doc: Value = app
        .server
        .post("/api/v2/documents/")
        .add_header("Authorization", bearer(&token))
        .multipart(document_form("Lease", "OTHER", "lease.pdf", PDF_BYTES))
        .await
        .json();
    let share: Value = app
        .server
        .get(&format!("/api/v2/documents/{}/share", doc["id"].as_str().unwrap()))
        .add_header("Authorization", bearer(&token))
        .await
        .json();

    let url = share["download_url"].as_str().unwrap();
    assert!(url.starts_with("http://localhost/api/v2/files/documents/"));

    let response = app.server.get(local_path(url)).await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), PDF_BYTES);

    app.server
        .get(&local_path(url).replacen("/api/v2/", "/api/v1/", 1))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_api_route_returns_json_404() {
    let app = TestApp::new();

    let response = app.server.get("/api/v1/nope").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.json::<Value>()["error"].is_string());
}
