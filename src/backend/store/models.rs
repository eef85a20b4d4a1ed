/**
 * Persistent Records
 *
 * Row types shared by every `Store` implementation. They derive
 * `sqlx::FromRow` for the PostgreSQL store and are plain values for the
 * in-memory store.
 */

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// A registered account
///
/// Deliberately not `Serialize`: API responses go through `UserResponse`
/// so the password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// bcrypt hash; empty for accounts created through Google sign-in
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_google_user: bool,
    pub google_user_id: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Fields supplied when creating a user
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub is_google_user: bool,
    pub google_user_id: Option<String>,
    pub profile_picture: Option<String>,
}

/// A stored document and the location of its file
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Object-storage key, `documents/{owner_id}/{uuid}{ext}`
    pub file_path: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub category: String,
    pub version: i32,
    pub is_shared: bool,
    pub owner_id: Uuid,
    pub folder_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Optional filters for listing documents
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub category: Option<String>,
    pub folder_id: Option<Uuid>,
}

/// A user-defined category label
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CustomCategory {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A named grouping of documents
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Audit record of a user action
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ActivityLog {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Dotted action name, e.g. `document.create`
    pub action: String,
    /// `document`, `category`, `folder` or `user`
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub details: Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Filters and paging for activity log queries
#[derive(Debug, Clone)]
pub struct ActivityFilter {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub action: Option<String>,
    pub resource_type: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Usage telemetry record
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub event_type: String,
    pub event_category: Option<String>,
    pub properties: Value,
    pub session_id: Option<String>,
    pub device_info: Value,
    /// Duration in milliseconds, when the event measures one
    pub duration: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Filters and paging for analytics event queries
#[derive(Debug, Clone)]
pub struct EventFilter {
    pub event_type: Option<String>,
    pub event_category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: i64,
    pub offset: i64,
}

/// Number of distinct active users on one UTC day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct DailyActiveUsers {
    pub date: NaiveDate,
    pub count: i64,
}

impl ActivityFilter {
    pub(crate) fn matches(&self, log: &ActivityLog) -> bool {
        self.start_date.map_or(true, |start| log.created_at >= start)
            && self.end_date.map_or(true, |end| log.created_at <= end)
            && self.action.as_deref().map_or(true, |a| log.action == a)
            && self
                .resource_type
                .as_deref()
                .map_or(true, |r| log.resource_type == r)
    }
}

impl EventFilter {
    pub(crate) fn matches(&self, event: &AnalyticsEvent) -> bool {
        self.start_date.map_or(true, |start| event.created_at >= start)
            && self.end_date.map_or(true, |end| event.created_at <= end)
            && self.event_type.as_deref().map_or(true, |t| event.event_type == t)
            && self
                .event_category
                .as_deref()
                .map_or(true, |c| event.event_category.as_deref() == Some(c))
    }
}
