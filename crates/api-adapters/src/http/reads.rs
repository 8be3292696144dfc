//! JSON read endpoints. Each one answers for the requesting viewer only.

use axum::extract::{Path, Query, State};
use axum::Json;
use domains::{CategoryId, Post, Topic};
use serde::Deserialize;
use services::CategoryListing;
use tracing::instrument;

use super::error::ApiError;
use super::viewer::Viewer;
use super::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub cid: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub term: Option<String>,
}

/// `GET /api/categories?page=`
#[instrument(skip(state))]
pub async fn categories(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(query): Query<PageQuery>,
) -> Result<Json<CategoryListing>, ApiError> {
    let listing = state.forum.categories.list(viewer.uid(), query.page).await?;
    Ok(Json(listing))
}

/// `GET /api/posts/date/{date}`
#[instrument(skip(state))]
pub async fn posts_by_date(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(date): Path<String>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state.forum.posts.filter_by_date(&date, viewer.uid()).await?;
    Ok(Json(posts))
}

/// `GET /api/topics/date/{date}?cid=`
#[instrument(skip(state))]
pub async fn topics_by_date(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(date): Path<String>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<Topic>>, ApiError> {
    let topics = state
        .forum
        .topics
        .topics_by_date(&date, query.cid.map(CategoryId), Some(viewer.uid()))
        .await?;
    Ok(Json(topics))
}

/// `GET /api/category/{cid}/search?term=`
#[instrument(skip(state))]
pub async fn search_category(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(cid): Path<u64>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Topic>>, ApiError> {
    let term = query.term.unwrap_or_default();
    let topics = state
        .forum
        .topics
        .search_in_category(&term, CategoryId(cid), viewer.uid())
        .await?;
    Ok(Json(topics))
}
