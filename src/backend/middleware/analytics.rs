/**
 * Request Tracking Middleware
 *
 * Records an `api_request` analytics event for every request except
 * `/health`, with the path, method, status code and duration. The event is
 * attributed to the bearer's user when the token verifies; no database
 * lookup is made for that. Recording is spawned onto the runtime so it
 * never delays or fails the response.
 *
 * Disabled with `TRACK_API_REQUESTS=false`.
 */

use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use serde_json::json;
use std::net::SocketAddr;

use crate::backend::activity::RequestMeta;
use crate::backend::analytics::{TrackEvent, API_EVENT_CATEGORY, API_REQUEST_EVENT};
use crate::backend::auth::sessions::bearer_token;
use crate::backend::server::state::AppState;

/// Paths that are never tracked
pub const UNTRACKED_PATHS: [&str; 1] = ["/health"];

pub async fn track_api_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !state.settings.track_api_requests || UNTRACKED_PATHS.contains(&path.as_str()) {
        return next.run(request).await;
    }

    let method = request.method().to_string();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let meta = RequestMeta::from_headers(request.headers(), peer);
    let user_id = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .and_then(|token| state.tokens.verify(token).ok())
        .and_then(|claims| claims.user_id());

    let started = Instant::now();
    let response = next.run(request).await;
    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
    let status_code = response.status().as_u16();

    let analytics = state.analytics.clone();
    tokio::spawn(async move {
        let event = TrackEvent {
            user_id,
            event_type: API_REQUEST_EVENT.to_string(),
            event_category: Some(API_EVENT_CATEGORY.to_string()),
            properties: json!({
                "path": path,
                "method": method,
                "status_code": status_code,
            }),
            session_id: None,
            duration: Some(duration_ms.round()),
        };
        if let Err(e) = analytics.track_event(event, Some(&meta)).await {
            tracing::warn!("Error tracking analytics: {}", e);
        }
    });

    response
}
