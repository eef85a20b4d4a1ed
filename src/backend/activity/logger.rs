/**
 * Activity Logger
 *
 * Records what users do to their documents, folders and categories. Writes
 * are best effort: a failed insert is logged with `tracing::warn!` and the
 * user's request carries on.
 */

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::backend::activity::meta::RequestMeta;
use crate::backend::store::{ActivityLog, ActivityStore, Store};

/// Writes `ActivityLog` records
#[derive(Clone)]
pub struct ActivityLogger {
    store: Arc<dyn Store>,
}

impl ActivityLogger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Record one action
    ///
    /// # Arguments
    ///
    /// * `user_id` - Acting user
    /// * `action` - Dotted action name, e.g. `document.update`
    /// * `resource_type` - `document`, `folder`, `category`, ...
    /// * `resource_id` - Id or name of the affected resource
    /// * `details` - JSON object with action-specific data
    /// * `meta` - Client IP and user agent
    ///
    /// # Returns
    ///
    /// The stored record, or `None` if it could not be written.
    pub async fn log_activity(
        &self,
        user_id: Uuid,
        action: &str,
        resource_type: &str,
        resource_id: Option<String>,
        details: Value,
        meta: &RequestMeta,
    ) -> Option<ActivityLog> {
        let details = match details {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        let entry = ActivityLog {
            id: Uuid::new_v4(),
            user_id,
            action: action.to_string(),
            resource_type: resource_type.to_string(),
            resource_id,
            details,
            ip_address: meta.ip_address.clone(),
            user_agent: meta.user_agent.clone(),
            created_at: Utc::now(),
        };

        match self.store.insert_activity(&entry).await {
            Ok(()) => Some(entry),
            Err(e) => {
                tracing::warn!("Error logging activity {} for user {}: {}", action, user_id, e);
                None
            }
        }
    }
}
