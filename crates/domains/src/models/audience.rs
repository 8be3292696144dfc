//! # Audience
//!
//! Who may read a post. Stored next to the post as JSON text (`["all"]`,
//! `["editors","writers"]`) and parsed back on every read.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Public sentinel token. Every viewer, guests included, satisfies it.
pub const ALL: &str = "all";

/// Implicit group of every authenticated viewer.
pub const REGISTERED_USERS: &str = "registered-users";

/// Posts whose stored audience is absent or unreadable predate the
/// visibility feature and stay readable by everyone.
pub const LEGACY_AUDIENCE_IS_PUBLIC: bool = true;

/// Ordered list of audience tokens: either exactly `["all"]` or one or more
/// group names. Construct restricted audiences through the validator only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Audience(Vec<String>);

impl Audience {
    pub fn public() -> Self {
        Self(vec![ALL.to_string()])
    }

    /// Wraps an already-validated list of group names.
    pub fn restricted(groups: Vec<String>) -> Self {
        Self(groups)
    }

    pub fn is_public(&self) -> bool {
        self.0.iter().any(|token| token == ALL)
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Storage form: a JSON array of strings.
    pub fn to_stored(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| format!("[\"{ALL}\"]"))
    }

    /// Parses the stored form. Absent, empty, or non-list values yield `None`;
    /// callers decide what `None` means (see [`LEGACY_AUDIENCE_IS_PUBLIC`]).
    pub fn from_stored(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        serde_json::from_str::<Vec<String>>(raw).ok().map(Self)
    }
}

impl Default for Audience {
    fn default() -> Self {
        Self::public()
    }
}

/// Reads a `visibleTo` request field that may arrive as a JSON array or as
/// JSON text of one. Anything else (numbers, objects, unparsable text,
/// arrays with non-string entries) is treated as "not a list".
pub fn requested_audience_from_json(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        Value::String(raw) => serde_json::from_str::<Vec<String>>(raw).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stored_form_round_trips_order() {
        let audience = Audience::restricted(vec!["writers".into(), "editors".into()]);
        let raw = audience.to_stored();
        assert_eq!(raw, r#"["writers","editors"]"#);
        assert_eq!(Audience::from_stored(&raw), Some(audience));
    }

    #[test]
    fn malformed_stored_values_are_absent() {
        assert_eq!(Audience::from_stored(""), None);
        assert_eq!(Audience::from_stored("not json"), None);
        assert_eq!(Audience::from_stored(r#""editors""#), None);
        assert_eq!(Audience::from_stored(r#"{"name":"editors"}"#), None);
    }

    #[test]
    fn public_detection_ignores_position() {
        assert!(Audience::public().is_public());
        assert!(Audience::restricted(vec!["a".into(), "all".into()]).is_public());
        assert!(!Audience::restricted(vec!["a".into()]).is_public());
    }

    #[test]
    fn request_field_accepts_array_or_json_text() {
        assert_eq!(
            requested_audience_from_json(&json!(["beta-testers"])),
            Some(vec!["beta-testers".to_string()])
        );
        assert_eq!(
            requested_audience_from_json(&json!(r#"["a","b"]"#)),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(requested_audience_from_json(&json!("{broken")), None);
        assert_eq!(requested_audience_from_json(&json!(42)), None);
        assert_eq!(requested_audience_from_json(&json!(["a", 1])), None);
    }
}
