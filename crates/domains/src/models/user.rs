use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Public-facing account fields used to build teasers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: UserId,
    pub username: String,
    pub displayname: String,
    pub userslug: String,
    pub picture: Option<String>,
    pub icon_text: String,
    pub icon_bg_color: String,
}

impl UserProfile {
    /// Convenience constructor deriving slug and icon from the username.
    pub fn new(uid: UserId, username: &str) -> Self {
        let icon_text = username
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string());
        Self {
            uid,
            username: username.to_string(),
            displayname: username.to_string(),
            userslug: username.to_lowercase().replace(' ', "-"),
            picture: None,
            icon_text,
            icon_bg_color: "#3f51b5".to_string(),
        }
    }
}
