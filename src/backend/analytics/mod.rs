//! Analytics Module
//!
//! Usage telemetry: per-request events recorded by middleware, events
//! reported by clients, and the aggregate summary.
//!
//! # Module Structure
//!
//! ```text
//! analytics/
//! ├── mod.rs          - Module exports
//! ├── service.rs      - AnalyticsService (track_event, summary)
//! └── handlers.rs     - /analytics HTTP handlers
//! ```
//!
//! Request tracking itself lives in `middleware::analytics`.

/// Event recording and aggregation
pub mod service;

/// HTTP handlers
pub mod handlers;

pub use service::{AnalyticsService, AnalyticsSummary, TrackEvent, API_EVENT_CATEGORY, API_REQUEST_EVENT};
pub use handlers::{list_activity_logs, list_events, summary, track_event};
