use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CategoryId, PostId, TopicId, UserId};

/// A Topic contains a collection of Posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub tid: TopicId,
    pub cid: CategoryId,
    pub uid: UserId,
    pub title: String,
    pub slug: String,
    pub main_pid: Option<PostId>,
    pub timestamp: DateTime<Utc>,
    /// The timestamp used for sorting topics by activity
    pub last_post_time: DateTime<Utc>,
    pub post_count: u64,
    pub locked: bool,
    pub pinned: bool,
    pub deleted: bool,
}

/// Input to topic creation; the main post is created alongside it.
#[derive(Debug, Clone, Default)]
pub struct NewTopic {
    pub uid: Option<UserId>,
    pub cid: CategoryId,
    pub title: String,
    pub content: String,
    pub visible_to: Option<Vec<String>>,
    pub anonymous: bool,
    pub handle: Option<String>,
    pub ip: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Input to a reply on an existing topic.
#[derive(Debug, Clone, Default)]
pub struct NewReply {
    pub uid: Option<UserId>,
    pub tid: TopicId,
    pub content: String,
    pub to_pid: Option<PostId>,
    pub visible_to: Option<Vec<String>>,
    pub anonymous: bool,
    pub handle: Option<String>,
    pub ip: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Lowercase, dash-separated slug prefixed with the topic id (`12/hello-world`).
pub fn slugify(tid: TopicId, title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for ch in title.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            slug.push(ch);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    format!("{tid}/{slug}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_punctuation() {
        assert_eq!(slugify(TopicId(4), "Welcome!  To the Forum"), "4/welcome-to-the-forum");
        assert_eq!(slugify(TopicId(5), "***"), "5/");
    }
}
