/**
 * PostgreSQL Store
 *
 * `Store` implementation over an `sqlx::PgPool`. Queries are checked at
 * runtime (`query_as` with `r#"..."#` SQL) so the crate builds without a
 * live database. The schema lives in `migrations/`.
 *
 * Unique-constraint violations surface as `StoreError::Conflict`; every
 * other driver error is `StoreError::Database`.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::store::models::{
    ActivityFilter, ActivityLog, AnalyticsEvent, CustomCategory, DailyActiveUsers, Document,
    DocumentFilter, EventFilter, Folder, NewUser, User,
};
use crate::backend::store::{
    ActivityStore, AnalyticsStore, CategoryStore, DocumentStore, FolderStore, StoreError,
    StoreResult, UserStore, DOCUMENT_MODIFIED,
};

const USER_COLUMNS: &str = "id, email, hashed_password, full_name, is_active, is_google_user, \
     google_user_id, profile_picture, created_at, last_login";

const DOCUMENT_COLUMNS: &str = "id, name, description, file_path, file_size, file_type, \
     category, version, is_shared, owner_id, folder_id, created_at, modified_at";

const FOLDER_COLUMNS: &str = "id, name, description, category, owner_id, created_at, updated_at";

const ACTIVITY_COLUMNS: &str = "id, user_id, action, resource_type, resource_id, details, \
     ip_address, user_agent, created_at";

const EVENT_COLUMNS: &str = "id, user_id, event_type, event_category, properties, session_id, \
     device_info, duration, created_at";

/// PostgreSQL-backed store
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Turn unique violations into `Conflict` with the given message
fn conflict_or(err: sqlx::Error, message: &str) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return StoreError::Conflict(message.to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let sql = format!(
            r#"
            INSERT INTO users (id, email, hashed_password, full_name, is_active, is_google_user,
                               google_user_id, profile_picture, created_at)
            VALUES ($1, $2, $3, $4, TRUE, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_user.email)
            .bind(&new_user.hashed_password)
            .bind(&new_user.full_name)
            .bind(new_user.is_google_user)
            .bind(&new_user.google_user_id)
            .bind(&new_user.profile_picture)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or(e, "Email already registered"))
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_google_id(&self, google_user_id: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE google_user_id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(google_user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn touch_last_login(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("User"));
        }
        Ok(())
    }

    async fn set_user_active(&self, id: Uuid, active: bool) -> StoreResult<()> {
        let result = sqlx::query("UPDATE users SET is_active = $1 WHERE id = $2")
            .bind(active)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("User"));
        }
        Ok(())
    }

    async fn link_google_account(
        &self,
        id: Uuid,
        google_user_id: &str,
        profile_picture: Option<&str>,
    ) -> StoreResult<User> {
        let sql = format!(
            r#"
            UPDATE users
            SET google_user_id = $1,
                is_google_user = TRUE,
                profile_picture = COALESCE($2, profile_picture)
            WHERE id = $3
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(google_user_id)
            .bind(profile_picture)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_or(e, "Google account already linked to another user"))?
            .ok_or(StoreError::NotFound("User"))
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert_document(&self, document: &Document) -> StoreResult<Document> {
        let sql = format!(
            r#"
            INSERT INTO documents (id, name, description, file_path, file_size, file_type,
                                   category, version, is_shared, owner_id, folder_id,
                                   created_at, modified_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        );

        let inserted = sqlx::query_as::<_, Document>(&sql)
            .bind(document.id)
            .bind(&document.name)
            .bind(&document.description)
            .bind(&document.file_path)
            .bind(document.file_size)
            .bind(&document.file_type)
            .bind(&document.category)
            .bind(document.version)
            .bind(document.is_shared)
            .bind(document.owner_id)
            .bind(document.folder_id)
            .bind(document.created_at)
            .bind(document.modified_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(inserted)
    }

    async fn find_document(&self, owner_id: Uuid, id: Uuid) -> StoreResult<Option<Document>> {
        let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1 AND owner_id = $2");
        let document = sqlx::query_as::<_, Document>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(document)
    }

    async fn list_documents(
        &self,
        owner_id: Uuid,
        filter: &DocumentFilter,
    ) -> StoreResult<Vec<Document>> {
        let sql = format!(
            r#"
            SELECT {DOCUMENT_COLUMNS}
            FROM documents
            WHERE owner_id = $1
              AND ($2::TEXT IS NULL OR category = $2)
              AND ($3::UUID IS NULL OR folder_id = $3)
            ORDER BY created_at DESC
            "#
        );

        let documents = sqlx::query_as::<_, Document>(&sql)
            .bind(owner_id)
            .bind(&filter.category)
            .bind(filter.folder_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(documents)
    }

    async fn update_document(
        &self,
        document: &Document,
        expected_version: i32,
    ) -> StoreResult<Document> {
        let sql = format!(
            r#"
            UPDATE documents
            SET name = $1, description = $2, file_path = $3, file_size = $4, file_type = $5,
                category = $6, version = $7, is_shared = $8, folder_id = $9, modified_at = $10
            WHERE id = $11 AND owner_id = $12 AND version = $13
            RETURNING {DOCUMENT_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Document>(&sql)
            .bind(&document.name)
            .bind(&document.description)
            .bind(&document.file_path)
            .bind(document.file_size)
            .bind(&document.file_type)
            .bind(&document.category)
            .bind(document.version)
            .bind(document.is_shared)
            .bind(document.folder_id)
            .bind(document.modified_at)
            .bind(document.id)
            .bind(document.owner_id)
            .bind(expected_version)
            .fetch_optional(&self.pool)
            .await?;
        if let Some(updated) = updated {
            return Ok(updated);
        }

        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM documents WHERE id = $1 AND owner_id = $2)",
        )
        .bind(document.id)
        .bind(document.owner_id)
        .fetch_one(&self.pool)
        .await?;
        if exists {
            Err(StoreError::Conflict(DOCUMENT_MODIFIED.to_string()))
        } else {
            Err(StoreError::NotFound("Document"))
        }
    }

    async fn delete_document(&self, owner_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CategoryStore for PgStore {
    async fn list_custom_categories(&self, owner_id: Uuid) -> StoreResult<Vec<CustomCategory>> {
        let categories = sqlx::query_as::<_, CustomCategory>(
            r#"
            SELECT id, owner_id, name, created_at
            FROM custom_categories
            WHERE owner_id = $1
            ORDER BY created_at ASC, name ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn insert_custom_category(
        &self,
        category: &CustomCategory,
        limit: usize,
    ) -> StoreResult<CustomCategory> {
        let mut tx = self.pool.begin().await?;

        // Serialises concurrent inserts for the same owner
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(category.owner_id)
            .fetch_optional(&mut *tx)
            .await?;

        let (count, taken): (i64, bool) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(BOOL_OR(name = $2), FALSE)
            FROM custom_categories
            WHERE owner_id = $1
            "#,
        )
        .bind(category.owner_id)
        .bind(&category.name)
        .fetch_one(&mut *tx)
        .await?;
        if taken {
            return Err(StoreError::Conflict(format!(
                "Category '{}' already exists",
                category.name
            )));
        }
        if count >= limit as i64 {
            return Err(StoreError::LimitReached(format!(
                "Maximum of {} custom categories allowed",
                limit
            )));
        }

        let inserted = sqlx::query_as::<_, CustomCategory>(
            r#"
            INSERT INTO custom_categories (id, owner_id, name, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner_id, name, created_at
            "#,
        )
        .bind(category.id)
        .bind(category.owner_id)
        .bind(&category.name)
        .bind(category.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_or(e, &format!("Category '{}' already exists", category.name)))?;

        tx.commit().await?;
        Ok(inserted)
    }

    async fn rename_custom_category(
        &self,
        owner_id: Uuid,
        old_name: &str,
        new_name: &str,
    ) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;

        let renamed = sqlx::query(
            "UPDATE custom_categories SET name = $1 WHERE owner_id = $2 AND name = $3",
        )
        .bind(new_name)
        .bind(owner_id)
        .bind(old_name)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_or(e, &format!("Category '{}' already exists", new_name)))?;

        if renamed.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound("Category"));
        }

        let documents = sqlx::query(
            r#"
            UPDATE documents
            SET category = $1, modified_at = $2
            WHERE owner_id = $3 AND category = $4
            "#,
        )
        .bind(new_name)
        .bind(Utc::now())
        .bind(owner_id)
        .bind(old_name)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE folders SET category = $1 WHERE owner_id = $2 AND category = $3")
            .bind(new_name)
            .bind(owner_id)
            .bind(old_name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(documents.rows_affected())
    }

    async fn delete_custom_category(
        &self,
        owner_id: Uuid,
        name: &str,
        fallback: &str,
    ) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM custom_categories WHERE owner_id = $1 AND name = $2")
            .bind(owner_id)
            .bind(name)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound("Category"));
        }

        let documents = sqlx::query(
            r#"
            UPDATE documents
            SET category = $1, modified_at = $2
            WHERE owner_id = $3 AND category = $4
            "#,
        )
        .bind(fallback)
        .bind(Utc::now())
        .bind(owner_id)
        .bind(name)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE folders SET category = $1 WHERE owner_id = $2 AND category = $3")
            .bind(fallback)
            .bind(owner_id)
            .bind(name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(documents.rows_affected())
    }
}

#[async_trait]
impl FolderStore for PgStore {
    async fn insert_folder(&self, folder: &Folder) -> StoreResult<Folder> {
        let sql = format!(
            r#"
            INSERT INTO folders (id, name, description, category, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {FOLDER_COLUMNS}
            "#
        );

        let inserted = sqlx::query_as::<_, Folder>(&sql)
            .bind(folder.id)
            .bind(&folder.name)
            .bind(&folder.description)
            .bind(&folder.category)
            .bind(folder.owner_id)
            .bind(folder.created_at)
            .bind(folder.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(inserted)
    }

    async fn find_folder(&self, owner_id: Uuid, id: Uuid) -> StoreResult<Option<Folder>> {
        let sql = format!("SELECT {FOLDER_COLUMNS} FROM folders WHERE id = $1 AND owner_id = $2");
        let folder = sqlx::query_as::<_, Folder>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(folder)
    }

    async fn list_folders(&self, owner_id: Uuid) -> StoreResult<Vec<Folder>> {
        let sql = format!("SELECT {FOLDER_COLUMNS} FROM folders WHERE owner_id = $1 ORDER BY name ASC");
        let folders = sqlx::query_as::<_, Folder>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(folders)
    }

    async fn delete_folder(&self, owner_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE documents SET folder_id = NULL WHERE owner_id = $1 AND folder_id = $2")
            .bind(owner_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM folders WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(deleted.rows_affected() > 0)
    }
}

#[async_trait]
impl ActivityStore for PgStore {
    async fn insert_activity(&self, log: &ActivityLog) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO activity_logs (id, user_id, action, resource_type, resource_id, details,
                                       ip_address, user_agent, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(log.id)
        .bind(log.user_id)
        .bind(&log.action)
        .bind(&log.resource_type)
        .bind(&log.resource_id)
        .bind(&log.details)
        .bind(&log.ip_address)
        .bind(&log.user_agent)
        .bind(log.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_activity(
        &self,
        user_id: Uuid,
        filter: &ActivityFilter,
    ) -> StoreResult<Vec<ActivityLog>> {
        let sql = format!(
            r#"
            SELECT {ACTIVITY_COLUMNS}
            FROM activity_logs
            WHERE user_id = $1
              AND ($2::TIMESTAMPTZ IS NULL OR created_at >= $2)
              AND ($3::TIMESTAMPTZ IS NULL OR created_at <= $3)
              AND ($4::TEXT IS NULL OR action = $4)
              AND ($5::TEXT IS NULL OR resource_type = $5)
            ORDER BY created_at DESC
            LIMIT $6 OFFSET $7
            "#
        );

        let logs = sqlx::query_as::<_, ActivityLog>(&sql)
            .bind(user_id)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(&filter.action)
            .bind(&filter.resource_type)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(logs)
    }

    async fn daily_active_users(
        &self,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<DailyActiveUsers>> {
        let rows = sqlx::query_as::<_, DailyActiveUsers>(
            r#"
            SELECT (created_at AT TIME ZONE 'UTC')::DATE AS date,
                   COUNT(DISTINCT user_id) AS count
            FROM activity_logs
            WHERE created_at >= $1
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl AnalyticsStore for PgStore {
    async fn insert_event(&self, event: &AnalyticsEvent) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO analytics_events (id, user_id, event_type, event_category, properties,
                                          session_id, device_info, duration, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event.id)
        .bind(event.user_id)
        .bind(&event.event_type)
        .bind(&event.event_category)
        .bind(&event.properties)
        .bind(&event.session_id)
        .bind(&event.device_info)
        .bind(event.duration)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_events(
        &self,
        user_id: Uuid,
        filter: &EventFilter,
    ) -> StoreResult<Vec<AnalyticsEvent>> {
        let sql = format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM analytics_events
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR event_type = $2)
              AND ($3::TEXT IS NULL OR event_category = $3)
              AND ($4::TIMESTAMPTZ IS NULL OR created_at >= $4)
              AND ($5::TIMESTAMPTZ IS NULL OR created_at <= $5)
            ORDER BY created_at DESC
            LIMIT $6 OFFSET $7
            "#
        );

        let events = sqlx::query_as::<_, AnalyticsEvent>(&sql)
            .bind(user_id)
            .bind(&filter.event_type)
            .bind(&filter.event_category)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn event_counts(&self, since: DateTime<Utc>) -> StoreResult<Vec<(String, i64)>> {
        let counts = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT event_type, COUNT(*) AS count
            FROM analytics_events
            WHERE created_at >= $1
            GROUP BY event_type
            ORDER BY event_type
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    async fn average_duration(
        &self,
        event_type: &str,
        since: DateTime<Utc>,
    ) -> StoreResult<Option<f64>> {
        let avg = sqlx::query_scalar::<_, Option<f64>>(
            r#"
            SELECT AVG(duration)
            FROM analytics_events
            WHERE event_type = $1 AND created_at >= $2 AND duration IS NOT NULL
            "#,
        )
        .bind(event_type)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;
        Ok(avg)
    }
}
