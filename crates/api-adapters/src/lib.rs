//! # api-adapters
//!
//! HTTP surface of rusty-forum: the composer endpoint and the JSON read
//! endpoints for category listings, date filters and in-category search.

#[cfg(feature = "web-axum")]
pub mod http;

#[cfg(feature = "web-axum")]
pub use http::{router, AppState};
