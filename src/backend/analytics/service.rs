/**
 * Analytics Service
 *
 * Records usage events (API requests, client-reported events) and builds
 * the summary served by `/analytics/summary`.
 */

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::backend::activity::RequestMeta;
use crate::backend::store::{
    ActivityStore, AnalyticsEvent, AnalyticsStore, DailyActiveUsers, Store, StoreResult,
};
use crate::shared::error::SharedError;

/// Event type recorded by the request-tracking middleware
pub const API_REQUEST_EVENT: &str = "api_request";

/// Category of [`API_REQUEST_EVENT`]
pub const API_EVENT_CATEGORY: &str = "api";

/// Column widths of `analytics_events`
pub const MAX_EVENT_TYPE_LEN: usize = 100;
pub const MAX_SESSION_ID_LEN: usize = 255;

/// An event to record
#[derive(Debug, Clone, Default)]
pub struct TrackEvent {
    pub user_id: Option<Uuid>,
    pub event_type: String,
    pub event_category: Option<String>,
    pub properties: Value,
    pub session_id: Option<String>,
    /// Milliseconds
    pub duration: Option<f64>,
}

impl TrackEvent {
    /// Check a client-reported event before it is stored
    ///
    /// # Errors
    ///
    /// `ValidationError` when `event_type` is blank, or when `event_type`,
    /// `event_category` or `session_id` exceed their column widths.
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.event_type.trim().is_empty() {
            return Err(SharedError::validation("event_type", "event_type is required"));
        }
        SharedError::check_length("event_type", &self.event_type, MAX_EVENT_TYPE_LEN)?;
        if let Some(category) = &self.event_category {
            SharedError::check_length("event_category", category, MAX_EVENT_TYPE_LEN)?;
        }
        if let Some(session_id) = &self.session_id {
            SharedError::check_length("session_id", session_id, MAX_SESSION_ID_LEN)?;
        }
        Ok(())
    }
}

/// Aggregated usage over a time window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub event_counts: BTreeMap<String, i64>,
    pub avg_request_duration_ms: Option<i64>,
    pub daily_active_users: Vec<DailyActiveUsers>,
}

/// Writes and aggregates analytics events
#[derive(Clone)]
pub struct AnalyticsService {
    store: Arc<dyn Store>,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Store an event
    ///
    /// `device_info` is filled from `meta` when given, otherwise left empty.
    pub async fn track_event(
        &self,
        event: TrackEvent,
        meta: Option<&RequestMeta>,
    ) -> StoreResult<AnalyticsEvent> {
        let properties = match event.properties {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        let record = AnalyticsEvent {
            id: Uuid::new_v4(),
            user_id: event.user_id,
            event_type: event.event_type,
            event_category: event.event_category,
            properties,
            session_id: event.session_id,
            device_info: meta
                .map(RequestMeta::device_info)
                .unwrap_or_else(|| Value::Object(Default::default())),
            duration: event.duration,
            created_at: Utc::now(),
        };
        self.store.insert_event(&record).await?;
        Ok(record)
    }

    /// Event counts, mean API request duration and daily active users over
    /// the last `days` days, across all users
    pub async fn summary(&self, days: i64) -> StoreResult<AnalyticsSummary> {
        let since = Utc::now() - Duration::days(days);

        let event_counts = self.store.event_counts(since).await?.into_iter().collect();
        let avg_request_duration_ms = self
            .store
            .average_duration(API_REQUEST_EVENT, since)
            .await?
            .map(|ms| ms.round() as i64);
        let daily_active_users = self.store.daily_active_users(since).await?;

        Ok(AnalyticsSummary {
            event_counts,
            avg_request_duration_ms,
            daily_active_users,
        })
    }
}
