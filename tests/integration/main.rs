//! Integration tests for DocNest
//!
//! Drives the full router with `axum-test` against the in-memory store, a
//! temporary upload directory and a stub Google verifier.

mod api;
mod common;
