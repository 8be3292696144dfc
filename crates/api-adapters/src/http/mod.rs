//! # HTTP (axum)
//!
//! Router assembly and shared state.

pub mod compose;
pub mod error;
pub mod reads;
pub mod viewer;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use services::ForumServices;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use viewer::{Viewer, VIEWER_HEADER};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub forum: ForumServices,
}

impl AppState {
    pub fn new(forum: ForumServices) -> Self {
        Self { forum }
    }
}

/// Builds the full router with tracing and CORS applied.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/compose", post(compose::compose))
        .route("/api/categories", get(reads::categories))
        .route("/api/posts/date/{date}", get(reads::posts_by_date))
        .route("/api/topics/date/{date}", get(reads::topics_by_date))
        .route("/api/category/{cid}/search", get(reads::search_category))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
