use serde::{Deserialize, Serialize};
use std::fmt;

/// A group as returned by a membership lookup: some backends hand back bare
/// names, others full records. Normalize with [`GroupRef::into_name`] as soon
/// as the lookup result is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupRef {
    Name(String),
    Record(GroupRecord),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub member_count: Option<u64>,
}

impl GroupRef {
    pub fn into_name(self) -> GroupName {
        match self {
            GroupRef::Name(name) => GroupName(name),
            GroupRef::Record(record) => GroupName(record.name),
        }
    }
}

/// Normalized group name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupName(pub String);

impl GroupName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Group whose members hold every privilege.
pub const ADMINISTRATORS: &str = "administrators";
/// Group whose members moderate every category.
pub const GLOBAL_MODERATORS: &str = "Global Moderators";

/// Capabilities checked through the permission port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Privilege {
    PostsModerate,
    PostsViewDeleted,
    TopicsRead,
    Find,
}

impl Privilege {
    pub fn as_str(self) -> &'static str {
        match self {
            Privilege::PostsModerate => "posts:moderate",
            Privilege::PostsViewDeleted => "posts:view_deleted",
            Privilege::TopicsRead => "topics:read",
            Privilege::Find => "find",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_lookup_shapes_normalize_to_a_name() {
        let refs: Vec<GroupRef> =
            serde_json::from_str(r#"["editors", {"name": "writers", "memberCount": 3}]"#).unwrap();
        let names: Vec<GroupName> = refs.into_iter().map(GroupRef::into_name).collect();
        assert_eq!(names, vec![GroupName("editors".into()), GroupName("writers".into())]);
    }
}
