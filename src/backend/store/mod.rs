//! Persistence Module
//!
//! All database access goes through the async traits defined here. Handlers
//! and services depend on `dyn Store`, so the same code runs against
//! PostgreSQL in production and against the in-memory store when no
//! database is configured (and in the test suite).
//!
//! # Architecture
//!
//! - **`models`** - Row types (`User`, `Document`, `Folder`, ...)
//! - **`postgres`** - `PgStore`, backed by an `sqlx::PgPool`
//! - **`memory`** - `MemoryStore`, backed by `tokio::sync::RwLock`
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs          - Store traits and StoreError
//! ├── models.rs       - Persistent record types
//! ├── postgres.rs     - PostgreSQL implementation
//! └── memory.rs       - In-memory implementation
//! ```
//!
//! # Ownership
//!
//! Every document, folder and category query takes the owner's id. A record
//! belonging to another user is indistinguishable from a missing one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Persistent record types
pub mod models;

/// PostgreSQL store
pub mod postgres;

/// In-memory store
pub mod memory;

pub use memory::MemoryStore;
pub use models::{
    ActivityFilter, ActivityLog, AnalyticsEvent, CustomCategory, DailyActiveUsers, Document,
    DocumentFilter, EventFilter, Folder, NewUser, User,
};
pub use postgres::PgStore;

/// Errors returned by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed record does not exist (or is not owned by the caller)
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness constraint was violated
    #[error("{0}")]
    Conflict(String),

    /// The owner already holds the maximum number of records of this kind
    #[error("{0}")]
    LimitReached(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// `Conflict` message for an update that lost a race
pub const DOCUMENT_MODIFIED: &str = "Document was modified concurrently";

/// User accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user; `Conflict` when the email or Google id is taken
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_google_id(&self, google_user_id: &str) -> StoreResult<Option<User>>;

    /// Set `last_login` to now
    async fn touch_last_login(&self, id: Uuid) -> StoreResult<()>;

    /// Activate or deactivate an account
    async fn set_user_active(&self, id: Uuid, active: bool) -> StoreResult<()>;

    /// Attach a Google identity to an existing account and mark it as a
    /// Google user. A `None` picture leaves the stored one untouched.
    async fn link_google_account(
        &self,
        id: Uuid,
        google_user_id: &str,
        profile_picture: Option<&str>,
    ) -> StoreResult<User>;
}

/// Document metadata
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_document(&self, document: &Document) -> StoreResult<Document>;

    async fn find_document(&self, owner_id: Uuid, id: Uuid) -> StoreResult<Option<Document>>;

    /// Owner's documents, newest first
    async fn list_documents(
        &self,
        owner_id: Uuid,
        filter: &DocumentFilter,
    ) -> StoreResult<Vec<Document>>;

    /// Overwrite every mutable column of an existing document
    ///
    /// Only applies while the stored version equals `expected_version`;
    /// otherwise `Conflict`. `NotFound` when the document is gone.
    async fn update_document(
        &self,
        document: &Document,
        expected_version: i32,
    ) -> StoreResult<Document>;

    /// Returns `false` when nothing was deleted
    async fn delete_document(&self, owner_id: Uuid, id: Uuid) -> StoreResult<bool>;
}

/// Per-user custom categories
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Owner's custom categories in creation order
    async fn list_custom_categories(&self, owner_id: Uuid) -> StoreResult<Vec<CustomCategory>>;

    /// Insert a category unless the owner already has `limit` of them
    ///
    /// The count and the insert are atomic per owner. `LimitReached` when
    /// the owner is at the limit, `Conflict` when the name is taken.
    async fn insert_custom_category(
        &self,
        category: &CustomCategory,
        limit: usize,
    ) -> StoreResult<CustomCategory>;

    /// Rename a category and every document and folder carrying it, in one
    /// transaction. Returns the number of documents updated.
    async fn rename_custom_category(
        &self,
        owner_id: Uuid,
        old_name: &str,
        new_name: &str,
    ) -> StoreResult<u64>;

    /// Delete a category, moving its documents and folders to `fallback`.
    /// Returns the number of documents reassigned.
    async fn delete_custom_category(
        &self,
        owner_id: Uuid,
        name: &str,
        fallback: &str,
    ) -> StoreResult<u64>;
}

/// Folders
#[async_trait]
pub trait FolderStore: Send + Sync {
    async fn insert_folder(&self, folder: &Folder) -> StoreResult<Folder>;

    async fn find_folder(&self, owner_id: Uuid, id: Uuid) -> StoreResult<Option<Folder>>;

    /// Owner's folders, alphabetical
    async fn list_folders(&self, owner_id: Uuid) -> StoreResult<Vec<Folder>>;

    /// Delete a folder and detach its documents. Returns `false` when
    /// nothing was deleted.
    async fn delete_folder(&self, owner_id: Uuid, id: Uuid) -> StoreResult<bool>;
}

/// Append-only activity log
#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn insert_activity(&self, log: &ActivityLog) -> StoreResult<()>;

    /// User's activity matching `filter`, newest first
    async fn list_activity(
        &self,
        user_id: Uuid,
        filter: &ActivityFilter,
    ) -> StoreResult<Vec<ActivityLog>>;

    /// Distinct active users per UTC day since `since`, ascending by date
    async fn daily_active_users(&self, since: DateTime<Utc>)
        -> StoreResult<Vec<DailyActiveUsers>>;
}

/// Append-only analytics events
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn insert_event(&self, event: &AnalyticsEvent) -> StoreResult<()>;

    /// User's events matching `filter`, newest first
    async fn list_events(
        &self,
        user_id: Uuid,
        filter: &EventFilter,
    ) -> StoreResult<Vec<AnalyticsEvent>>;

    /// Event counts per type since `since`, across all users
    async fn event_counts(&self, since: DateTime<Utc>) -> StoreResult<Vec<(String, i64)>>;

    /// Mean `duration` of events of `event_type` since `since`
    async fn average_duration(
        &self,
        event_type: &str,
        since: DateTime<Utc>,
    ) -> StoreResult<Option<f64>>;
}

/// Everything the application persists
pub trait Store:
    UserStore + DocumentStore + CategoryStore + FolderStore + ActivityStore + AnalyticsStore
{
}

impl<T> Store for T where
    T: UserStore + DocumentStore + CategoryStore + FolderStore + ActivityStore + AnalyticsStore
{
}
