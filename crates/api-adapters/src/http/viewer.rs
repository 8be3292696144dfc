//! Request identity. Authentication happens upstream; this layer only reads
//! the resolved uid the gateway forwards.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use domains::{DomainError, UserId};

use super::error::ApiError;

/// Header carrying the authenticated uid. Absent means guest.
pub const VIEWER_HEADER: &str = "x-forum-uid";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer(pub UserId);

impl Viewer {
    pub fn uid(self) -> UserId {
        self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Viewer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(VIEWER_HEADER) else {
            return Ok(Viewer(UserId::GUEST));
        };
        raw.to_str()
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(|uid| Viewer(UserId(uid)))
            .ok_or_else(|| DomainError::InvalidUid.into())
    }
}

/// First hop of `x-forwarded-for`, if any.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request, StatusCode};

    async fn extract(header: Option<&str>) -> Result<Viewer, ApiError> {
        let mut builder = Request::builder();
        if let Some(value) = header {
            builder = builder.header(VIEWER_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Viewer::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn missing_header_is_a_guest() {
        assert_eq!(extract(None).await.unwrap(), Viewer(UserId::GUEST));
        assert_eq!(extract(Some(" 12 ")).await.unwrap(), Viewer(UserId(12)));
    }

    #[tokio::test]
    async fn garbage_uid_is_rejected() {
        let err = extract(Some("abc")).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.key, "[[error:invalid-uid]]");
    }

    #[test]
    fn forwarded_ip_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1, 10.0.0.2"));
        assert_eq!(client_ip(&headers).as_deref(), Some("10.0.0.1"));
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }
}
