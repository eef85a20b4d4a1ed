//! Common test utilities and helpers
//!
//! - `TestApp`: a router over a fresh `MemoryStore` and temp upload dir
//! - Auth helpers: register, log in, bearer headers
//! - Upload helpers: multipart forms with small valid files

#![allow(dead_code)]

pub mod auth_helpers;
pub mod server;

pub use auth_helpers::*;
pub use server::*;
