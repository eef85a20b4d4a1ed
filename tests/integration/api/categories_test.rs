//! Category API tests
//!
//! Tests for:
//! - Default and custom category listing
//! - Creation rules (normalisation, duplicates, limit)
//! - Rename and delete cascading onto documents and folders

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::*;

async fn create_category(app: &TestApp, user: &TestUser, name: &str) -> axum_test::TestResponse {
    app.server
        .post("/api/v1/categories")
        .add_header("Authorization", bearer(&user.token))
        .json(&json!({ "name": name }))
        .await
}

async fn upload(app: &TestApp, user: &TestUser, category: &str) -> Value {
    let response = app
        .server
        .post("/api/v1/documents/")
        .add_header("Authorization", bearer(&user.token))
        .multipart(document_form("Receipt", category, "receipt.pdf", PDF_BYTES))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

async fn fetch_document(app: &TestApp, user: &TestUser, id: &str) -> Value {
    app.server
        .get(&format!("/api/v1/documents/{}", id))
        .add_header("Authorization", bearer(&user.token))
        .await
        .json()
}

#[tokio::test]
async fn test_list_defaults_for_new_user() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;

    let response = app
        .server
        .get("/api/v1/categories")
        .add_header("Authorization", bearer(&user.token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["defaults"],
        json!(["GOVERNMENT", "MEDICAL", "EDUCATIONAL", "OTHER"])
    );
    assert_eq!(body["custom"], json!([]));
    assert_eq!(body["all"], body["defaults"]);
}

#[tokio::test]
async fn test_create_category_normalises_name() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;

    let response = create_category(&app, &user, "  home   insurance ").await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["name"], "HOME_INSURANCE");

    let listed: Value = app
        .server
        .get("/api/v1/categories")
        .add_header("Authorization", bearer(&user.token))
        .await
        .json();
    assert_eq!(listed["custom"], json!(["HOME_INSURANCE"]));
    assert_eq!(listed["all"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_create_category_rejects_duplicate() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    create_category(&app, &user, "finance").await.assert_status(StatusCode::CREATED);

    let response = create_category(&app, &user, "Finance").await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"], "Category 'FINANCE' already exists");
}

#[tokio::test]
async fn test_create_category_rejects_default_name() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;

    let response = create_category(&app, &user, "medical").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "'MEDICAL' is a default category");
}

#[tokio::test]
async fn test_create_category_rejects_invalid_names() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;

    let too_long = "A".repeat(31);
    for name in ["", "x", "9LIVES", "TAXES!", too_long.as_str()] {
        create_category(&app, &user, name)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_custom_category_limit() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;

    for i in 0..20 {
        create_category(&app, &user, &format!("label {}", i))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = create_category(&app, &user, "one too many").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Maximum of 20 custom categories allowed");
}

#[tokio::test]
async fn test_custom_categories_are_per_user() {
    let app = TestApp::new();
    let alice = create_unique_test_user(&app.server).await;
    let bob = create_unique_test_user(&app.server).await;
    create_category(&app, &alice, "hobbies").await.assert_status(StatusCode::CREATED);

    let bob_view: Value = app
        .server
        .get("/api/v1/categories")
        .add_header("Authorization", bearer(&bob.token))
        .await
        .json();
    assert_eq!(bob_view["custom"], json!([]));

    // Bob cannot file documents under Alice's label
    app.server
        .post("/api/v1/documents/")
        .add_header("Authorization", bearer(&bob.token))
        .multipart(document_form("Guitar", "hobbies", "tab.pdf", PDF_BYTES))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rename_cascades_to_documents() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    create_category(&app, &user, "bills").await.assert_status(StatusCode::CREATED);
    let doc = upload(&app, &user, "bills").await;
    let untouched = upload(&app, &user, "OTHER").await;

    let response = app
        .server
        .put("/api/v1/categories/bills")
        .add_header("Authorization", bearer(&user.token))
        .json(&json!({ "new_name": "utilities" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["category"], "UTILITIES");
    assert_eq!(body["documents_updated"], 1);

    let renamed = fetch_document(&app, &user, doc["id"].as_str().unwrap()).await;
    assert_eq!(renamed["category"], "UTILITIES");
    let other = fetch_document(&app, &user, untouched["id"].as_str().unwrap()).await;
    assert_eq!(other["category"], "OTHER");
}

#[tokio::test]
async fn test_rename_rejections() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    create_category(&app, &user, "travel").await.assert_status(StatusCode::CREATED);
    create_category(&app, &user, "trips").await.assert_status(StatusCode::CREATED);

    let rename = |from: &'static str, to: &'static str| {
        app.server
            .put(&format!("/api/v1/categories/{}", from))
            .add_header("Authorization", bearer(&user.token))
            .json(&json!({ "new_name": to }))
    };

    rename("GOVERNMENT", "STATE").await.assert_status(StatusCode::BAD_REQUEST);
    rename("MISSING", "FOUND").await.assert_status(StatusCode::NOT_FOUND);
    rename("TRAVEL", "trips").await.assert_status(StatusCode::CONFLICT);
    rename("TRAVEL", "travel").await.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_reassigns_documents_and_folders() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;
    create_category(&app, &user, "archive").await.assert_status(StatusCode::CREATED);
    let doc = upload(&app, &user, "archive").await;
    let folder: Value = app
        .server
        .post("/api/v1/folders")
        .add_header("Authorization", bearer(&user.token))
        .json(&json!({ "name": "Old stuff", "category": "archive" }))
        .await
        .json();

    let response = app
        .server
        .delete("/api/v1/categories/archive")
        .add_header("Authorization", bearer(&user.token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["deleted"], "ARCHIVE");
    assert_eq!(body["documents_reassigned"], 1);

    let reassigned = fetch_document(&app, &user, doc["id"].as_str().unwrap()).await;
    assert_eq!(reassigned["category"], "OTHER");
    let folder: Value = app
        .server
        .get(&format!("/api/v1/folders/{}", folder["id"].as_str().unwrap()))
        .add_header("Authorization", bearer(&user.token))
        .await
        .json();
    assert_eq!(folder["category"], "OTHER");
}

#[tokio::test]
async fn test_delete_default_category_rejected() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;

    let response = app
        .server
        .delete("/api/v1/categories/other")
        .add_header("Authorization", bearer(&user.token))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Default categories cannot be deleted");
}
