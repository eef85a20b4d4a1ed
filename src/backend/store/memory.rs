/**
 * In-Memory Store
 *
 * `Store` implementation that keeps every table in a `Vec` behind a single
 * `tokio::sync::RwLock`. Used when `DATABASE_URL` is not configured and by
 * the integration tests. Multi-table operations (category rename, folder
 * delete) run under one write lock, which gives them the same all-or-nothing
 * behaviour as the transactional PostgreSQL versions.
 */

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::store::models::{
    ActivityFilter, ActivityLog, AnalyticsEvent, CustomCategory, DailyActiveUsers, Document,
    DocumentFilter, EventFilter, Folder, NewUser, User,
};
use crate::backend::store::{
    ActivityStore, AnalyticsStore, CategoryStore, DocumentStore, FolderStore, StoreError,
    StoreResult, UserStore, DOCUMENT_MODIFIED,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    documents: Vec<Document>,
    categories: Vec<CustomCategory>,
    folders: Vec<Folder>,
    activity: Vec<ActivityLog>,
    events: Vec<AnalyticsEvent>,
}

/// Volatile store for development and tests
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest-first ordering that keeps later inserts ahead on timestamp ties
fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().cloned().collect();
    out.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    out
}

fn page<T>(rows: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    rows.into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::Conflict("Email already registered".to_string()));
        }
        if let Some(google_id) = &new_user.google_user_id {
            if tables
                .users
                .iter()
                .any(|u| u.google_user_id.as_ref() == Some(google_id))
            {
                return Err(StoreError::Conflict(
                    "Google account already linked to another user".to_string(),
                ));
            }
        }

        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            hashed_password: new_user.hashed_password,
            full_name: new_user.full_name,
            is_active: true,
            is_google_user: new_user.is_google_user,
            google_user_id: new_user.google_user_id,
            profile_picture: new_user.profile_picture,
            created_at: Utc::now(),
            last_login: None,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_google_id(&self, google_user_id: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.google_user_id.as_deref() == Some(google_user_id))
            .cloned())
    }

    async fn touch_last_login(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound("User"))?;
        user.last_login = Some(Utc::now());
        Ok(())
    }

    async fn set_user_active(&self, id: Uuid, active: bool) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound("User"))?;
        user.is_active = active;
        Ok(())
    }

    async fn link_google_account(
        &self,
        id: Uuid,
        google_user_id: &str,
        profile_picture: Option<&str>,
    ) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables
            .users
            .iter()
            .any(|u| u.id != id && u.google_user_id.as_deref() == Some(google_user_id))
        {
            return Err(StoreError::Conflict(
                "Google account already linked to another user".to_string(),
            ));
        }

        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound("User"))?;
        user.google_user_id = Some(google_user_id.to_string());
        user.is_google_user = true;
        if let Some(picture) = profile_picture {
            user.profile_picture = Some(picture.to_string());
        }
        Ok(user.clone())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_document(&self, document: &Document) -> StoreResult<Document> {
        let mut tables = self.tables.write().await;
        tables.documents.push(document.clone());
        Ok(document.clone())
    }

    async fn find_document(&self, owner_id: Uuid, id: Uuid) -> StoreResult<Option<Document>> {
        let tables = self.tables.read().await;
        Ok(tables
            .documents
            .iter()
            .find(|d| d.id == id && d.owner_id == owner_id)
            .cloned())
    }

    async fn list_documents(
        &self,
        owner_id: Uuid,
        filter: &DocumentFilter,
    ) -> StoreResult<Vec<Document>> {
        let tables = self.tables.read().await;
        let owned: Vec<Document> = tables
            .documents
            .iter()
            .filter(|d| d.owner_id == owner_id)
            .filter(|d| filter.category.as_ref().map_or(true, |c| &d.category == c))
            .filter(|d| filter.folder_id.map_or(true, |f| d.folder_id == Some(f)))
            .cloned()
            .collect();
        Ok(newest_first(&owned, |d| d.created_at))
    }

    async fn update_document(
        &self,
        document: &Document,
        expected_version: i32,
    ) -> StoreResult<Document> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .documents
            .iter_mut()
            .find(|d| d.id == document.id && d.owner_id == document.owner_id)
            .ok_or(StoreError::NotFound("Document"))?;
        if existing.version != expected_version {
            return Err(StoreError::Conflict(DOCUMENT_MODIFIED.to_string()));
        }
        *existing = Document {
            created_at: existing.created_at,
            ..document.clone()
        };
        Ok(existing.clone())
    }

    async fn delete_document(&self, owner_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.documents.len();
        tables
            .documents
            .retain(|d| !(d.id == id && d.owner_id == owner_id));
        Ok(tables.documents.len() < before)
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_custom_categories(&self, owner_id: Uuid) -> StoreResult<Vec<CustomCategory>> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert_custom_category(
        &self,
        category: &CustomCategory,
        limit: usize,
    ) -> StoreResult<CustomCategory> {
        let mut tables = self.tables.write().await;
        let owned: Vec<&CustomCategory> = tables
            .categories
            .iter()
            .filter(|c| c.owner_id == category.owner_id)
            .collect();
        if owned.iter().any(|c| c.name == category.name) {
            return Err(StoreError::Conflict(format!(
                "Category '{}' already exists",
                category.name
            )));
        }
        if owned.len() >= limit {
            return Err(StoreError::LimitReached(format!(
                "Maximum of {} custom categories allowed",
                limit
            )));
        }
        tables.categories.push(category.clone());
        Ok(category.clone())
    }

    async fn rename_custom_category(
        &self,
        owner_id: Uuid,
        old_name: &str,
        new_name: &str,
    ) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;

        if tables
            .categories
            .iter()
            .any(|c| c.owner_id == owner_id && c.name == new_name)
        {
            return Err(StoreError::Conflict(format!(
                "Category '{}' already exists",
                new_name
            )));
        }

        let category = tables
            .categories
            .iter_mut()
            .find(|c| c.owner_id == owner_id && c.name == old_name)
            .ok_or(StoreError::NotFound("Category"))?;
        category.name = new_name.to_string();

        let now = Utc::now();
        let mut updated = 0;
        for document in tables
            .documents
            .iter_mut()
            .filter(|d| d.owner_id == owner_id && d.category == old_name)
        {
            document.category = new_name.to_string();
            document.modified_at = now;
            updated += 1;
        }
        for folder in tables
            .folders
            .iter_mut()
            .filter(|f| f.owner_id == owner_id && f.category == old_name)
        {
            folder.category = new_name.to_string();
        }
        Ok(updated)
    }

    async fn delete_custom_category(
        &self,
        owner_id: Uuid,
        name: &str,
        fallback: &str,
    ) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;

        let before = tables.categories.len();
        tables
            .categories
            .retain(|c| !(c.owner_id == owner_id && c.name == name));
        if tables.categories.len() == before {
            return Err(StoreError::NotFound("Category"));
        }

        let now = Utc::now();
        let mut reassigned = 0;
        for document in tables
            .documents
            .iter_mut()
            .filter(|d| d.owner_id == owner_id && d.category == name)
        {
            document.category = fallback.to_string();
            document.modified_at = now;
            reassigned += 1;
        }
        for folder in tables
            .folders
            .iter_mut()
            .filter(|f| f.owner_id == owner_id && f.category == name)
        {
            folder.category = fallback.to_string();
        }
        Ok(reassigned)
    }
}

#[async_trait]
impl FolderStore for MemoryStore {
    async fn insert_folder(&self, folder: &Folder) -> StoreResult<Folder> {
        let mut tables = self.tables.write().await;
        tables.folders.push(folder.clone());
        Ok(folder.clone())
    }

    async fn find_folder(&self, owner_id: Uuid, id: Uuid) -> StoreResult<Option<Folder>> {
        let tables = self.tables.read().await;
        Ok(tables
            .folders
            .iter()
            .find(|f| f.id == id && f.owner_id == owner_id)
            .cloned())
    }

    async fn list_folders(&self, owner_id: Uuid) -> StoreResult<Vec<Folder>> {
        let tables = self.tables.read().await;
        let mut folders: Vec<Folder> = tables
            .folders
            .iter()
            .filter(|f| f.owner_id == owner_id)
            .cloned()
            .collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(folders)
    }

    async fn delete_folder(&self, owner_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        let before = tables.folders.len();
        tables
            .folders
            .retain(|f| !(f.id == id && f.owner_id == owner_id));
        if tables.folders.len() == before {
            return Ok(false);
        }

        for document in tables
            .documents
            .iter_mut()
            .filter(|d| d.owner_id == owner_id && d.folder_id == Some(id))
        {
            document.folder_id = None;
        }
        Ok(true)
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn insert_activity(&self, log: &ActivityLog) -> StoreResult<()> {
        self.tables.write().await.activity.push(log.clone());
        Ok(())
    }

    async fn list_activity(
        &self,
        user_id: Uuid,
        filter: &ActivityFilter,
    ) -> StoreResult<Vec<ActivityLog>> {
        let tables = self.tables.read().await;
        let matching: Vec<ActivityLog> = tables
            .activity
            .iter()
            .filter(|log| log.user_id == user_id && filter.matches(log))
            .cloned()
            .collect();
        Ok(page(
            newest_first(&matching, |log| log.created_at),
            filter.limit,
            filter.offset,
        ))
    }

    async fn daily_active_users(
        &self,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<DailyActiveUsers>> {
        let tables = self.tables.read().await;
        let mut per_day: BTreeMap<NaiveDate, BTreeSet<Uuid>> = BTreeMap::new();
        for log in tables.activity.iter().filter(|log| log.created_at >= since) {
            per_day
                .entry(log.created_at.date_naive())
                .or_default()
                .insert(log.user_id);
        }
        Ok(per_day
            .into_iter()
            .map(|(date, users)| DailyActiveUsers {
                date,
                count: users.len() as i64,
            })
            .collect())
    }
}

#[async_trait]
impl AnalyticsStore for MemoryStore {
    async fn insert_event(&self, event: &AnalyticsEvent) -> StoreResult<()> {
        self.tables.write().await.events.push(event.clone());
        Ok(())
    }

    async fn list_events(
        &self,
        user_id: Uuid,
        filter: &EventFilter,
    ) -> StoreResult<Vec<AnalyticsEvent>> {
        let tables = self.tables.read().await;
        let matching: Vec<AnalyticsEvent> = tables
            .events
            .iter()
            .filter(|event| event.user_id == Some(user_id) && filter.matches(event))
            .cloned()
            .collect();
        Ok(page(
            newest_first(&matching, |event| event.created_at),
            filter.limit,
            filter.offset,
        ))
    }

    async fn event_counts(&self, since: DateTime<Utc>) -> StoreResult<Vec<(String, i64)>> {
        let tables = self.tables.read().await;
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for event in tables.events.iter().filter(|e| e.created_at >= since) {
            *counts.entry(event.event_type.clone()).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn average_duration(
        &self,
        event_type: &str,
        since: DateTime<Utc>,
    ) -> StoreResult<Option<f64>> {
        let tables = self.tables.read().await;
        let durations: Vec<f64> = tables
            .events
            .iter()
            .filter(|e| e.event_type == event_type && e.created_at >= since)
            .filter_map(|e| e.duration)
            .collect();
        if durations.is_empty() {
            return Ok(None);
        }
        Ok(Some(durations.iter().sum::<f64>() / durations.len() as f64))
    }
}
