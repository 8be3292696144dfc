use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::audience::Audience;
use super::ids::{CategoryId, PostId, TopicId, UserId};

/// A boolean field that older rows may hold as text (`"true"` / `"false"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredFlag {
    Bool(bool),
    Text(String),
}

impl StoredFlag {
    /// Only `true` and the text `"true"` count as set.
    pub fn is_set(&self) -> bool {
        match self {
            StoredFlag::Bool(value) => *value,
            StoredFlag::Text(text) => text == "true",
        }
    }
}

impl From<bool> for StoredFlag {
    fn from(value: bool) -> Self {
        StoredFlag::Bool(value)
    }
}

/// The fundamental unit of conversation, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub pid: PostId,
    /// `0` marks a guest-authored post.
    pub uid: UserId,
    pub tid: TopicId,
    /// Denormalized from the topic when the post is created.
    pub cid: Option<CategoryId>,
    pub content: String,
    pub source_content: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Raw stored audience; `None` on rows created before the field existed.
    pub visible_to: Option<String>,
    /// `None` on rows created before the flag existed.
    pub anonymous: Option<StoredFlag>,
    pub to_pid: Option<PostId>,
    /// Poster address, kept for moderators only and never serialized.
    #[serde(default, skip_serializing)]
    pub ip: Option<String>,
    pub handle: Option<String>,
    pub deleted: bool,
    pub replies: u64,
}

impl Post {
    /// Parsed audience, or `None` when absent or malformed.
    pub fn audience(&self) -> Option<Audience> {
        self.visible_to.as_deref().and_then(Audience::from_stored)
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous.as_ref().is_some_and(StoredFlag::is_set)
    }
}

/// Input to post creation.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    /// `None` means the caller never resolved an identity; guests pass `Some(UserId::GUEST)`.
    pub uid: Option<UserId>,
    pub tid: TopicId,
    pub content: String,
    pub source_content: Option<String>,
    /// Caller-supplied pid; allocated from the sequence when absent.
    pub pid: Option<PostId>,
    pub timestamp: Option<DateTime<Utc>>,
    pub to_pid: Option<PostId>,
    /// Requested audience. `None` covers both "absent" and "not a list".
    pub visible_to: Option<Vec<String>>,
    pub anonymous: bool,
    pub ip: Option<String>,
    pub handle: Option<String>,
    pub is_main: bool,
}

/// Field-level update used by data upgrades.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    pub visible_to: Option<String>,
    pub anonymous: Option<StoredFlag>,
}

/// Ordered pid sets kept by the store, scored by post timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostSet {
    /// `posts:pid`
    All,
    /// `cid:{cid}:pids`
    Category(CategoryId),
    /// `tid:{tid}:posts`
    Topic(TopicId),
    /// `pid:{pid}:replies`
    Replies(PostId),
}

impl PostSet {
    pub fn key(&self) -> String {
        match self {
            PostSet::All => "posts:pid".to_string(),
            PostSet::Category(cid) => format!("cid:{cid}:pids"),
            PostSet::Topic(tid) => format!("tid:{tid}:posts"),
            PostSet::Replies(pid) => format!("pid:{pid}:replies"),
        }
    }
}
