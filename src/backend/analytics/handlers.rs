/**
 * Analytics Handlers
 *
 * - `POST /analytics/events` - record a client-side event
 * - `GET /analytics/logs` - caller's activity log
 * - `GET /analytics/events` - caller's analytics events
 * - `GET /analytics/summary` - usage summary over the last `days` days
 *
 * Listings are newest first and paged with `limit` (default 50, at most
 * 100) and `offset`.
 */

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::backend::activity::RequestMeta;
use crate::backend::analytics::service::{AnalyticsSummary, TrackEvent};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::CurrentUser;
use crate::backend::server::state::AppState;
use crate::backend::store::{
    ActivityFilter, ActivityLog, ActivityStore, AnalyticsEvent, AnalyticsStore, EventFilter,
};

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 100;
pub const DEFAULT_SUMMARY_DAYS: i64 = 30;
pub const MAX_SUMMARY_DAYS: i64 = 365;

/// Body of `POST /analytics/events`
#[derive(Debug, Deserialize)]
pub struct TrackEventRequest {
    pub event_type: String,
    pub event_category: Option<String>,
    #[serde(default)]
    pub properties: Value,
    pub session_id: Option<String>,
    pub duration: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub action: Option<String>,
    pub resource_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    pub event_type: Option<String>,
    pub event_category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub days: Option<i64>,
}

/// Validate `limit`/`offset`, applying the default limit
pub fn paging(limit: Option<i64>, offset: Option<i64>) -> BackendResult<(i64, i64)> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(BackendError::bad_request(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }
    let offset = offset.unwrap_or(0);
    if offset < 0 {
        return Err(BackendError::bad_request("offset cannot be negative"));
    }
    Ok((limit, offset))
}

/// Record a client-side event for the caller
///
/// # Errors
///
/// * `400 Bad Request` - Empty `event_type`, or a field longer than its column
pub async fn track_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    meta: RequestMeta,
    Json(request): Json<TrackEventRequest>,
) -> BackendResult<(StatusCode, Json<AnalyticsEvent>)> {
    let event = TrackEvent {
        user_id: Some(user.id),
        event_type: request.event_type.trim().to_string(),
        event_category: request.event_category,
        properties: request.properties,
        session_id: request.session_id,
        duration: request.duration,
    };
    event.validate()?;

    let event = state.analytics.track_event(event, Some(&meta)).await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// Caller's activity log
pub async fn list_activity_logs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<LogsQuery>,
) -> BackendResult<Json<Vec<ActivityLog>>> {
    let (limit, offset) = paging(query.limit, query.offset)?;
    let filter = ActivityFilter {
        start_date: query.start_date,
        end_date: query.end_date,
        action: query.action,
        resource_type: query.resource_type,
        limit,
        offset,
    };
    Ok(Json(state.store.list_activity(user.id, &filter).await?))
}

/// Caller's analytics events
pub async fn list_events(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<EventsQuery>,
) -> BackendResult<Json<Vec<AnalyticsEvent>>> {
    let (limit, offset) = paging(query.limit, query.offset)?;
    let filter = EventFilter {
        event_type: query.event_type,
        event_category: query.event_category,
        start_date: query.start_date,
        end_date: query.end_date,
        limit,
        offset,
    };
    Ok(Json(state.store.list_events(user.id, &filter).await?))
}

/// Usage summary over the last `days` days (1-365, default 30)
pub async fn summary(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Query(query): Query<SummaryQuery>,
) -> BackendResult<Json<AnalyticsSummary>> {
    let days = query.days.unwrap_or(DEFAULT_SUMMARY_DAYS);
    if !(1..=MAX_SUMMARY_DAYS).contains(&days) {
        return Err(BackendError::bad_request(format!(
            "days must be between 1 and {}",
            MAX_SUMMARY_DAYS
        )));
    }
    Ok(Json(state.analytics.summary(days).await?))
}
