//! # Composer
//!
//! `POST /compose`: the no-script composer submit, sent either as a
//! urlencoded form or as JSON. A body with `tid` is a reply, a body with
//! `cid` starts a topic. Every failure, including an unreadable body, is
//! answered with `400` and the error key.

use axum::extract::{FromRequest, Request, State};
use axum::http::{header, HeaderMap};
use axum::response::Redirect;
use axum::{Form, Json};
use domains::{
    requested_audience_from_json, CategoryId, NewReply, NewTopic, PostId, StoredFlag, TopicId,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::error::ApiError;
use super::viewer::{client_ip, Viewer};
use super::AppState;

/// Ids arrive as numbers from JSON clients and as text from form posts.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdField {
    Number(u64),
    Text(String),
}

impl IdField {
    /// `None` for blank text; malformed text is invalid data.
    fn parse(self) -> Result<Option<u64>, ApiError> {
        match self {
            IdField::Number(id) => Ok(Some(id)),
            IdField::Text(text) if text.trim().is_empty() => Ok(None),
            IdField::Text(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ApiError::invalid_data()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeBody {
    pub content: Option<String>,
    pub title: Option<String>,
    pub tid: Option<IdField>,
    pub cid: Option<IdField>,
    pub to_pid: Option<IdField>,
    /// Array of group names, or JSON text of one.
    pub visible_to: Option<Value>,
    pub anonymous: Option<StoredFlag>,
    pub handle: Option<String>,
}

impl<S: Send + Sync> FromRequest<S> for ComposeBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        let body = if is_form {
            Form::<ComposeBody>::from_request(req, state)
                .await
                .map(|Form(body)| body)
                .map_err(|rejection| {
                    debug!(%rejection, "unreadable composer form");
                    ApiError::invalid_data()
                })?
        } else {
            Json::<ComposeBody>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .map_err(|rejection| {
                    debug!(%rejection, "unreadable composer body");
                    ApiError::invalid_data()
                })?
        };
        Ok(body)
    }
}

fn parse_id(field: Option<IdField>) -> Result<Option<u64>, ApiError> {
    field.map_or(Ok(None), IdField::parse)
}

/// Requested audience. Blank or unparsable values fall back to public.
fn requested_audience(raw: Option<&Value>) -> Option<Vec<String>> {
    let raw = raw.filter(|value| match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    })?;
    let parsed = requested_audience_from_json(raw);
    if parsed.is_none() {
        debug!(visible_to = %raw, "unparsable visibleTo, posting publicly");
    }
    parsed
}

#[instrument(skip(state, headers, body), fields(uid = %viewer.uid()))]
pub async fn compose(
    State(state): State<AppState>,
    viewer: Viewer,
    headers: HeaderMap,
    body: ComposeBody,
) -> Result<Redirect, ApiError> {
    // 1. Content is mandatory
    let content = body
        .content
        .filter(|content| !content.is_empty())
        .ok_or_else(ApiError::invalid_data)?;

    // 2. Shared fields
    let uid = Some(viewer.uid());
    let visible_to = requested_audience(body.visible_to.as_ref());
    let anonymous = body.anonymous.is_some_and(|flag| flag.is_set());
    let ip = client_ip(&headers);

    // 3. Reply or new topic
    if let Some(tid) = parse_id(body.tid)? {
        let post = state
            .forum
            .topics
            .reply(NewReply {
                uid,
                tid: TopicId(tid),
                content,
                to_pid: parse_id(body.to_pid)?.map(PostId),
                visible_to,
                anonymous,
                handle: body.handle,
                ip,
                timestamp: None,
            })
            .await
            .map_err(ApiError::rejected)?;
        info!(pid = %post.pid, tid, "reply composed");
        return Ok(Redirect::to(&format!("/post/{}", post.pid)));
    }

    if let Some(cid) = parse_id(body.cid)? {
        let created = state
            .forum
            .topics
            .post(NewTopic {
                uid,
                cid: CategoryId(cid),
                title: body.title.unwrap_or_default(),
                content,
                visible_to,
                anonymous,
                handle: body.handle,
                ip,
                timestamp: None,
            })
            .await
            .map_err(ApiError::rejected)?;
        info!(tid = %created.topic_data.tid, cid, "topic composed");
        return Ok(Redirect::to(&format!("/topic/{}", created.topic_data.slug)));
    }

    Err(ApiError::invalid_data())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn audience_accepts_arrays_and_json_text() {
        let array = json!(["editors", "writers"]);
        assert_eq!(
            requested_audience(Some(&array)),
            Some(vec!["editors".to_string(), "writers".to_string()])
        );
        let text = json!(r#"["editors"]"#);
        assert_eq!(requested_audience(Some(&text)), Some(vec!["editors".to_string()]));
    }

    #[test]
    fn blank_or_broken_audience_is_public() {
        assert_eq!(requested_audience(None), None);
        assert_eq!(requested_audience(Some(&json!(""))), None);
        assert_eq!(requested_audience(Some(&json!("not json"))), None);
        assert_eq!(requested_audience(Some(&json!(42))), None);
    }

    #[test]
    fn ids_accept_numbers_and_text() {
        assert_eq!(parse_id(Some(IdField::Number(4))).unwrap(), Some(4));
        assert_eq!(parse_id(Some(IdField::Text(" 7 ".into()))).unwrap(), Some(7));
        assert_eq!(parse_id(Some(IdField::Text(String::new()))).unwrap(), None);
        assert!(parse_id(Some(IdField::Text("seven".into()))).is_err());
    }
}
