//! Document API tests
//!
//! Tests for:
//! - Multipart upload and its validation
//! - Listing with category and folder filters
//! - Partial updates and file replacement
//! - Download headers and deletion
//! - Owner isolation

use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::*;

async fn upload(app: &TestApp, user: &TestUser, name: &str, category: &str) -> Value {
    let response = app
        .server
        .post("/api/v1/documents/")
        .add_header("Authorization", bearer(&user.token))
        .multipart(document_form(name, category, "report.pdf", PDF_BYTES))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_create_document() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;

    let body = upload(&app, &user, "Tax return", "government").await;

    assert_eq!(body["name"], "Tax return");
    assert_eq!(body["category"], "GOVERNMENT");
    assert_eq!(body["file_type"], "application/pdf");
    assert_eq!(body["file_size"], PDF_BYTES.len() as i64);
    assert_eq!(body["version"], 1);
    assert_eq!(body["owner_id"], user.id.as_str());
    let key = body["file_path"].as_str().unwrap();
    assert!(key.starts_with(&format!("documents/{}/", user.id)));
    assert!(key.ends_with(".pdf"));
    assert_eq!(count_files(app.upload_dir.path()), 1);
}

#[tokio::test]
async fn test_create_document_requires_auth() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/documents/")
        .multipart(document_form("Doc", "OTHER", "a.pdf", PDF_BYTES))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_document_rejects_extension() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;

    let response = app
        .server
        .post("/api/v1/documents/")
        .add_header("Authorization", bearer(&user.token))
        .multipart(document_form("Script", "OTHER", "run.exe", b"MZ"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("File type not allowed"));
    assert_eq!(count_files(app.upload_dir.path()), 0);
}

#[tokio::test]
async fn test_create_document_rejects_oversized_file() {
    let app = TestApp::with_settings(|settings| settings.max_file_size = 16);
    let user = create_unique_test_user(&app.server).await;

    let response = app
        .server
        .post("/api/v1/documents/")
        .add_header("Authorization", bearer(&user.token))
        .multipart(document_form("Big", "OTHER", "big.pdf", &[b'%'; 64]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("File too large"));
}

#[tokio::test]
async fn test_create_document_rejects_unknown_category() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;

    let response = app
        .server
        .post("/api/v1/documents/")
        .add_header("Authorization", bearer(&user.token))
        .multipart(document_form("Doc", "finance", "a.pdf", PDF_BYTES))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Unknown category 'FINANCE'");
}

#[tokio::test]
async fn test_create_document_without_file() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;

    let form = MultipartForm::new()
        .add_text("name", "Empty")
        .add_text("category", "OTHER");
    let response = app
        .server
        .post("/api/v1/documents/")
        .add_header("Authorization", bearer(&user.token))
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file provided");
}

#[tokio::test]
async fn test_list_documents_filters_by_category() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    upload(&app, &user, "Passport", "GOVERNMENT").await;
    upload(&app, &user, "X-ray", "MEDICAL").await;

    let all: Vec<Value> = app
        .server
        .get("/api/v1/documents/")
        .add_header("Authorization", bearer(&user.token))
        .await
        .json();
    assert_eq!(all.len(), 2);

    let response = app
        .server
        .get("/api/v1/documents/")
        .add_header("Authorization", bearer(&user.token))
        .add_query_param("category", "medical")
        .await;
    response.assert_status_ok();
    let medical: Vec<Value> = response.json();
    assert_eq!(medical.len(), 1);
    assert_eq!(medical[0]["name"], "X-ray");
}

#[tokio::test]
async fn test_documents_are_isolated_per_owner() {
    let app = TestApp::new();
    let alice = create_unique_test_user(&app.server).await;
    let bob = create_unique_test_user(&app.server).await;
    let doc = upload(&app, &alice, "Private", "OTHER").await;
    let id = doc["id"].as_str().unwrap();

    let listed: Vec<Value> = app
        .server
        .get("/api/v1/documents/")
        .add_header("Authorization", bearer(&bob.token))
        .await
        .json();
    assert!(listed.is_empty());

    for response in [
        app.server
            .get(&format!("/api/v1/documents/{}", id))
            .add_header("Authorization", bearer(&bob.token))
            .await,
        app.server
            .get(&format!("/api/v1/documents/{}/download", id))
            .add_header("Authorization", bearer(&bob.token))
            .await,
        app.server
            .delete(&format!("/api/v1/documents/{}", id))
            .add_header("Authorization", bearer(&bob.token))
            .await,
    ] {
        response.assert_status(StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_get_document_logs_view() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    let doc = upload(&app, &user, "Diploma", "EDUCATIONAL").await;
    let id = doc["id"].as_str().unwrap();

    let response = app
        .server
        .get(&format!("/api/v1/documents/{}", id))
        .add_header("Authorization", bearer(&user.token))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["name"], "Diploma");

    let logs: Vec<Value> = app
        .server
        .get("/api/v1/analytics/logs")
        .add_header("Authorization", bearer(&user.token))
        .add_query_param("action", "document.view")
        .await
        .json();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["resource_id"], id);
}

#[tokio::test]
async fn test_update_document_metadata_keeps_version() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    let doc = upload(&app, &user, "Draft", "OTHER").await;
    let id = doc["id"].as_str().unwrap();

    let form = MultipartForm::new()
        .add_text("name", "Final")
        .add_text("category", "medical");
    let response = app
        .server
        .put(&format!("/api/v1/documents/{}", id))
        .add_header("Authorization", bearer(&user.token))
        .multipart(form)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "Final");
    assert_eq!(body["category"], "MEDICAL");
    assert_eq!(body["version"], 1);
    assert_eq!(body["file_path"], doc["file_path"]);
}

#[tokio::test]
async fn test_update_document_replaces_file() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    let doc = upload(&app, &user, "Scan", "OTHER").await;
    let id = doc["id"].as_str().unwrap();

    let form = MultipartForm::new().add_part("file", file_part("scan.png", PNG_BYTES));
    let response = app
        .server
        .put(&format!("/api/v1/documents/{}", id))
        .add_header("Authorization", bearer(&user.token))
        .multipart(form)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["version"], 2);
    assert_eq!(body["file_type"], "image/png");
    assert_ne!(body["file_path"], doc["file_path"]);
    assert!(body["file_path"].as_str().unwrap().ends_with(".png"));
    // The previous file is removed
    assert_eq!(count_files(app.upload_dir.path()), 1);
}

#[tokio::test]
async fn test_update_document_rejects_bad_file_without_changes() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    let doc = upload(&app, &user, "Keep", "OTHER").await;
    let id = doc["id"].as_str().unwrap();

    let form = MultipartForm::new()
        .add_text("name", "Renamed")
        .add_part("file", file_part("notes.txt", b"hello"));
    let response = app
        .server
        .put(&format!("/api/v1/documents/{}", id))
        .add_header("Authorization", bearer(&user.token))
        .multipart(form)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let current: Value = app
        .server
        .get(&format!("/api/v1/documents/{}", id))
        .add_header("Authorization", bearer(&user.token))
        .await
        .json();
    assert_eq!(current["name"], "Keep");
    assert_eq!(count_files(app.upload_dir.path()), 1);
}

#[tokio::test]
async fn test_download_document() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    let doc = upload(&app, &user, "Lab results", "MEDICAL").await;
    let id = doc["id"].as_str().unwrap();

    let response = app
        .server
        .get(&format!("/api/v1/documents/{}/download", id))
        .add_header("Authorization", bearer(&user.token))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/pdf");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"Lab results.pdf\""
    );
    assert_eq!(response.as_bytes().as_ref(), PDF_BYTES);
}

#[tokio::test]
async fn test_delete_document_removes_file() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    let doc = upload(&app, &user, "Old", "OTHER").await;
    let id = doc["id"].as_str().unwrap();

    app.server
        .delete(&format!("/api/v1/documents/{}", id))
        .add_header("Authorization", bearer(&user.token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert_eq!(count_files(app.upload_dir.path()), 0);
    app.server
        .get(&format!("/api/v1/documents/{}", id))
        .add_header("Authorization", bearer(&user.token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_document_is_not_found() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;

    let response = app
        .server
        .get(&format!("/api/v1/documents/{}", uuid::Uuid::new_v4()))
        .add_header("Authorization", bearer(&user.token))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>(), json!({ "error": "Document not found", "status": 404 }));
}
