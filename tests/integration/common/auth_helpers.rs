//! Authentication test helpers

use axum_test::TestServer;
use serde_json::{json, Value};

/// Registered user with a valid access token
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Register a user and log them in
pub async fn create_test_user(server: &TestServer, email: &str, password: &str) -> TestUser {
    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "email": email,
            "password": password,
            "full_name": "Test User"
        }))
        .await;
    response.assert_status_ok();
    let user: Value = response.json();

    let token = login(server, email, password).await["access_token"]
        .as_str()
        .expect("access token")
        .to_string();

    TestUser {
        id: user["id"].as_str().expect("user id").to_string(),
        email: email.to_string(),
        password: password.to_string(),
        token,
    }
}

/// Register a user with a unique email
pub async fn create_unique_test_user(server: &TestServer) -> TestUser {
    let email = format!("test_{}@example.com", uuid::Uuid::new_v4().simple());
    create_test_user(server, &email, "password123").await
}

/// Log in through the OAuth2 password form and return the token body
pub async fn login(server: &TestServer, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/v1/auth/login")
        .form(&[("username", email), ("password", password)])
        .await;
    response.assert_status_ok();
    response.json()
}
