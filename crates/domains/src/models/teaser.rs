//! # Teasers
//!
//! Presentation-ready summaries of a category's latest post. The embedded
//! author carries every key spelling the render paths read, so anything that
//! rewrites identity must rewrite all of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{PostId, TopicId, UserId};
use super::post::Post;
use super::topic::Topic;
use super::user::UserProfile;

/// Author fields as embedded in a teaser, including legacy aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeaserUser {
    pub uid: UserId,
    pub username: String,
    pub displayname: String,
    pub userslug: Option<String>,
    pub picture: Option<String>,
    #[serde(rename = "icon:text")]
    pub icon_text_keyed: String,
    #[serde(rename = "iconText")]
    pub icon_text: String,
    #[serde(rename = "icon:bgColor")]
    pub icon_bg_color_keyed: String,
    #[serde(rename = "iconBgColor")]
    pub icon_bg_color: String,
    #[serde(rename = "username:escaped")]
    pub username_escaped: String,
    #[serde(rename = "displayname:escaped")]
    pub displayname_escaped: String,
    #[serde(rename = "userslug:escaped")]
    pub userslug_escaped: String,
}

impl From<&UserProfile> for TeaserUser {
    fn from(profile: &UserProfile) -> Self {
        Self {
            uid: profile.uid,
            username: profile.username.clone(),
            displayname: profile.displayname.clone(),
            userslug: Some(profile.userslug.clone()),
            picture: profile.picture.clone(),
            icon_text_keyed: profile.icon_text.clone(),
            icon_text: profile.icon_text.clone(),
            icon_bg_color_keyed: profile.icon_bg_color.clone(),
            icon_bg_color: profile.icon_bg_color.clone(),
            username_escaped: html_escape::encode_safe(&profile.username).to_string(),
            displayname_escaped: html_escape::encode_safe(&profile.displayname).to_string(),
            userslug_escaped: html_escape::encode_safe(&profile.userslug).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teaser {
    pub pid: Option<PostId>,
    pub tid: TopicId,
    pub timestamp: DateTime<Utc>,
    pub topic_title: String,
    pub topic_slug: String,
    pub user: Option<TeaserUser>,
}

impl Teaser {
    pub fn new(post: &Post, topic: &Topic, author: Option<&UserProfile>) -> Self {
        Self {
            pid: Some(post.pid),
            tid: post.tid,
            timestamp: post.timestamp,
            topic_title: topic.title.clone(),
            topic_slug: topic.slug.clone(),
            user: author.map(TeaserUser::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_serialize_under_their_render_keys() {
        let mut profile = UserProfile::new(UserId(7), "ada <3");
        profile.userslug = "ada-3".into();
        let user = TeaserUser::from(&profile);
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["icon:text"], "A");
        assert_eq!(json["iconText"], "A");
        assert_eq!(json["username:escaped"], "ada &lt;3");
        assert_eq!(json["userslug"], "ada-3");
    }
}
