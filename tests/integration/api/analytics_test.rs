//! Analytics and activity log API tests
//!
//! Tests for:
//! - Explicit event tracking and listing
//! - Activity log filtering and paging
//! - Usage summary
//! - Automatic `api_request` tracking

use std::time::Duration;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::*;

fn quiet_app() -> TestApp {
    TestApp::with_settings(|settings| settings.track_api_requests = false)
}

async fn track(app: &TestApp, user: &TestUser, event_type: &str) -> Value {
    let response = app
        .server
        .post("/api/v1/analytics/events")
        .add_header("Authorization", bearer(&user.token))
        .add_header("User-Agent", "docnest-tests/1.0")
        .json(&json!({
            "event_type": event_type,
            "event_category": "ui",
            "properties": { "page": "/dashboard" },
            "session_id": "session-1"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_track_event() {
    let app = quiet_app();
    let user = create_unique_test_user(&app.server).await;

    let event = track(&app, &user, "page_view").await;

    assert_eq!(event["event_type"], "page_view");
    assert_eq!(event["event_category"], "ui");
    assert_eq!(event["user_id"], user.id.as_str());
    assert_eq!(event["properties"]["page"], "/dashboard");
    assert_eq!(event["session_id"], "session-1");
    assert_eq!(event["device_info"]["user_agent"], "docnest-tests/1.0");
}

#[tokio::test]
async fn test_track_event_requires_type() {
    let app = quiet_app();
    let user = create_unique_test_user(&app.server).await;

    let response = app
        .server
        .post("/api/v1/analytics/events")
        .add_header("Authorization", bearer(&user.token))
        .json(&json!({ "event_type": "  " }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "event_type is required");
}

#[tokio::test]
async fn test_track_event_rejects_overlong_fields() {
    let app = quiet_app();
    let user = create_unique_test_user(&app.server).await;

    let cases = [
        (json!({ "event_type": "e".repeat(101) }), "event_type must be at most 100 characters"),
        (
            json!({ "event_type": "page_view", "event_category": "c".repeat(101) }),
            "event_category must be at most 100 characters",
        ),
        (
            json!({ "event_type": "page_view", "session_id": "s".repeat(256) }),
            "session_id must be at most 255 characters",
        ),
    ];
    for (body, message) in cases {
        let response = app
            .server
            .post("/api/v1/analytics/events")
            .add_header("Authorization", bearer(&user.token))
            .json(&body)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], message);
    }

    let events: Vec<Value> = app
        .server
        .get("/api/v1/analytics/events")
        .add_header("Authorization", bearer(&user.token))
        .await
        .json();
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_list_events_filters_by_type() {
    let app = quiet_app();
    let user = create_unique_test_user(&app.server).await;
    let other = create_unique_test_user(&app.server).await;
    track(&app, &user, "page_view").await;
    track(&app, &user, "page_view").await;
    track(&app, &user, "search").await;
    track(&app, &other, "page_view").await;

    let events: Vec<Value> = app
        .server
        .get("/api/v1/analytics/events")
        .add_header("Authorization", bearer(&user.token))
        .add_query_param("event_type", "page_view")
        .await
        .json();

    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e["user_id"] == user.id.as_str()));
}

#[tokio::test]
async fn test_activity_logs_record_document_lifecycle() {
    let app = quiet_app();
    let user = create_unique_test_user(&app.server).await;

    let doc: Value = app
        .server
        .post("/api/v1/documents/")
        .add_header("Authorization", bearer(&user.token))
        .multipart(document_form("Will", "OTHER", "will.pdf", PDF_BYTES))
        .await
        .json();
    let id = doc["id"].as_str().unwrap();
    app.server
        .delete(&format!("/api/v1/documents/{}", id))
        .add_header("Authorization", bearer(&user.token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let logs: Vec<Value> = app
        .server
        .get("/api/v1/analytics/logs")
        .add_header("Authorization", bearer(&user.token))
        .add_query_param("resource_type", "document")
        .await
        .json();

    let actions: Vec<&str> = logs.iter().map(|l| l["action"].as_str().unwrap()).collect();
    assert_eq!(actions.len(), 2);
    assert!(actions.contains(&"document.create"));
    assert!(actions.contains(&"document.delete"));
    assert!(logs.iter().all(|l| l["resource_id"] == id));
}

#[tokio::test]
async fn test_activity_logs_paging() {
    let app = quiet_app();
    let user = create_unique_test_user(&app.server).await;
    for name in ["alpha", "beta", "gamma"] {
        app.server
            .post("/api/v1/categories")
            .add_header("Authorization", bearer(&user.token))
            .json(&json!({ "name": name }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let page: Vec<Value> = app
        .server
        .get("/api/v1/analytics/logs")
        .add_header("Authorization", bearer(&user.token))
        .add_query_param("action", "category.create")
        .add_query_param("limit", 2)
        .await
        .json();
    assert_eq!(page.len(), 2);

    let rest: Vec<Value> = app
        .server
        .get("/api/v1/analytics/logs")
        .add_header("Authorization", bearer(&user.token))
        .add_query_param("action", "category.create")
        .add_query_param("limit", 2)
        .add_query_param("offset", 2)
        .await
        .json();
    assert_eq!(rest.len(), 1);

    app.server
        .get("/api/v1/analytics/logs")
        .add_header("Authorization", bearer(&user.token))
        .add_query_param("limit", 101)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_summary() {
    let app = quiet_app();
    let user = create_unique_test_user(&app.server).await;
    track(&app, &user, "page_view").await;
    track(&app, &user, "page_view").await;
    app.server
        .post("/api/v1/folders")
        .add_header("Authorization", bearer(&user.token))
        .json(&json!({ "name": "Active", "category": "OTHER" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = app
        .server
        .get("/api/v1/analytics/summary")
        .add_header("Authorization", bearer(&user.token))
        .add_query_param("days", 7)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["event_counts"]["page_view"], 2);
    assert!(body["avg_request_duration_ms"].is_null());
    let daily = body["daily_active_users"].as_array().unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0]["count"], 1);
}

#[tokio::test]
async fn test_summary_rejects_out_of_range_days() {
    let app = quiet_app();
    let user = create_unique_test_user(&app.server).await;

    for days in [0, 366] {
        app.server
            .get("/api/v1/analytics/summary")
            .add_header("Authorization", bearer(&user.token))
            .add_query_param("days", days)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_api_requests_are_tracked() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app.server).await;

    app.server
        .get("/api/v1/auth/me")
        .add_header("Authorization", bearer(&user.token))
        .await
        .assert_status_ok();

    // Recording happens off the request path
    let mut tracked = Vec::new();
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let events: Vec<Value> = app
            .server
            .get("/api/v1/analytics/events")
            .add_header("Authorization", bearer(&user.token))
            .add_query_param("event_type", "api_request")
            .await
            .json();
        tracked = events
            .into_iter()
            .filter(|e| e["properties"]["path"] == "/api/v1/auth/me")
            .collect();
        if !tracked.is_empty() {
            break;
        }
    }

    assert_eq!(tracked.len(), 1);
    assert_eq!(tracked[0]["properties"]["method"], "GET");
    assert_eq!(tracked[0]["properties"]["status_code"], 200);
}

#[tokio::test]
async fn test_health_is_not_tracked() {
    let app = TestApp::new();

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "status": "healthy" }));
}
