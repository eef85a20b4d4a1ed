//! API integration tests
//!
//! One module per resource, each driving the router through `axum-test`.

mod analytics_test;
mod auth_test;
mod categories_test;
mod documents_test;
mod files_test;
