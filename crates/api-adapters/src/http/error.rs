//! # ApiError
//!
//! Every failure leaves the server as `{ "error": "<key>" }` with a status
//! derived from the domain error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::DomainError;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{status}: {key}")]
pub struct ApiError {
    pub status: StatusCode,
    pub key: String,
}

impl ApiError {
    pub fn new(status: StatusCode, key: impl Into<String>) -> Self {
        Self {
            status,
            key: key.into(),
        }
    }

    /// Same key, forced to `400 Bad Request`. The composer reports every
    /// failure this way.
    pub fn rejected(err: impl Into<ApiError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            ..err.into()
        }
    }

    pub fn invalid_data() -> Self {
        DomainError::InvalidData("request".into()).into()
    }
}

fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::GuestRestrictedPost => StatusCode::FORBIDDEN,
        DomainError::NotFound(..) => StatusCode::NOT_FOUND,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::UnknownGroups(_)
        | DomainError::InvalidUid
        | DomainError::InvalidPid
        | DomainError::InvalidDate(_)
        | DomainError::InvalidData(_)
        | DomainError::TopicLocked => StatusCode::BAD_REQUEST,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = status_for(&err);
        if status.is_server_error() {
            error!(error = %err, "request failed");
        } else {
            debug!(error = %err, "request rejected");
        }
        Self::new(status, err.key())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.key }))).into_response()
    }
}
