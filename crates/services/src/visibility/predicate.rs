//! Read-time visibility filtering.

use std::collections::HashSet;

use domains::{GroupRef, GroupService, Post, UserId, ALL, LEGACY_AUDIENCE_IS_PUBLIC, REGISTERED_USERS};
use tracing::{debug, trace, warn};

/// The audience tokens a viewer satisfies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerGroups {
    names: HashSet<String>,
}

impl ViewerGroups {
    /// Guests satisfy the public token only.
    pub fn guest() -> Self {
        Self {
            names: HashSet::from([ALL.to_string()]),
        }
    }

    /// Implicit tokens of an authenticated viewer plus `memberships`,
    /// normalized to plain names.
    pub fn authenticated(memberships: impl IntoIterator<Item = GroupRef>) -> Self {
        let mut names: HashSet<String> = memberships
            .into_iter()
            .map(|group| group.into_name().0)
            .collect();
        names.insert(REGISTERED_USERS.to_string());
        names.insert(ALL.to_string());
        Self { names }
    }

    /// Looks up the viewer's memberships once. A failed lookup leaves the
    /// viewer with its implicit tokens only.
    pub async fn resolve(viewer: UserId, groups: &dyn GroupService) -> Self {
        if viewer.is_guest() {
            return Self::guest();
        }
        match groups.get_user_groups(&[viewer]).await {
            Ok(mut per_user) => {
                let memberships = if per_user.is_empty() {
                    Vec::new()
                } else {
                    per_user.swap_remove(0)
                };
                Self::authenticated(memberships)
            }
            Err(err) => {
                warn!(uid = %viewer, error = %err, "group lookup failed, using implicit groups");
                Self::authenticated(Vec::new())
            }
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.names.contains(token)
    }
}

/// Whether a viewer holding `viewer_groups` may read `post`.
pub fn is_visible(post: &Post, viewer_groups: &ViewerGroups) -> bool {
    let Some(audience) = post.audience() else {
        trace!(pid = %post.pid, "no readable audience");
        return LEGACY_AUDIENCE_IS_PUBLIC;
    };
    if audience.is_public() {
        return true;
    }
    audience.tokens().iter().any(|token| viewer_groups.contains(token))
}

/// Keeps the posts `viewer` may read, in their original order. Membership is
/// resolved once for the whole batch.
pub async fn filter_visible(posts: Vec<Post>, viewer: UserId, groups: &dyn GroupService) -> Vec<Post> {
    if posts.is_empty() {
        return posts;
    }
    let viewer_groups = ViewerGroups::resolve(viewer, groups).await;

    let before = posts.len();
    let visible: Vec<Post> = posts
        .into_iter()
        .filter(|post| is_visible(post, &viewer_groups))
        .collect();
    debug!(uid = %viewer, before, after = visible.len(), "visibility filter applied");
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::{DomainError, GroupRecord, MockGroupService, PostId, TopicId};

    fn post(pid: u64, visible_to: Option<&str>) -> Post {
        Post {
            pid: PostId(pid),
            uid: UserId(1),
            tid: TopicId(1),
            cid: None,
            content: format!("post {pid}"),
            source_content: None,
            timestamp: Utc::now(),
            visible_to: visible_to.map(str::to_string),
            anonymous: None,
            to_pid: None,
            ip: None,
            handle: None,
            deleted: false,
            replies: 0,
        }
    }

    fn member_of(names: &[&str]) -> ViewerGroups {
        ViewerGroups::authenticated(names.iter().map(|n| GroupRef::Name(n.to_string())))
    }

    #[test]
    fn public_and_legacy_posts_are_visible_to_guests() {
        let guest = ViewerGroups::guest();
        assert!(is_visible(&post(1, Some(r#"["all"]"#)), &guest));
        assert!(is_visible(&post(2, None), &guest));
        assert!(is_visible(&post(3, Some("{not json")), &guest));
        assert!(is_visible(&post(4, Some(r#"["editors","all"]"#)), &guest));
    }

    #[test]
    fn restricted_posts_need_a_shared_group() {
        let restricted = post(1, Some(r#"["editors"]"#));
        assert!(!is_visible(&restricted, &ViewerGroups::guest()));
        assert!(is_visible(&restricted, &member_of(&["editors"])));
        assert!(!is_visible(&restricted, &member_of(&["writers"])));
    }

    #[test]
    fn registered_users_token_matches_any_authenticated_viewer() {
        let members_only = post(1, Some(r#"["registered-users"]"#));
        assert!(is_visible(&members_only, &member_of(&[])));
        assert!(!is_visible(&members_only, &ViewerGroups::guest()));
    }

    #[test]
    fn deleted_groups_never_match() {
        let orphaned = post(1, Some(r#"["disbanded"]"#));
        assert!(!is_visible(&orphaned, &member_of(&["editors"])));
    }

    #[tokio::test]
    async fn batch_resolves_membership_once_and_keeps_order() {
        let mut groups = MockGroupService::new();
        groups
            .expect_get_user_groups()
            .times(1)
            .withf(|uids| uids == [UserId(9)])
            .returning(|_| {
                Ok(vec![vec![GroupRef::Record(GroupRecord {
                    name: "editors".into(),
                    slug: Some("editors".into()),
                    member_count: Some(2),
                })]])
            });

        let posts = vec![
            post(1, Some(r#"["editors"]"#)),
            post(2, Some(r#"["writers"]"#)),
            post(3, None),
            post(4, Some(r#"["all"]"#)),
            post(5, Some(r#"["writers","editors"]"#)),
        ];
        let visible = filter_visible(posts, UserId(9), &groups).await;
        let pids: Vec<u64> = visible.iter().map(|p| p.pid.get()).collect();
        assert_eq!(pids, vec![1, 3, 4, 5]);
    }

    #[tokio::test]
    async fn guests_never_hit_the_registry() {
        let mut groups = MockGroupService::new();
        groups.expect_get_user_groups().never();

        let visible = filter_visible(
            vec![post(1, Some(r#"["editors"]"#)), post(2, None)],
            UserId::GUEST,
            &groups,
        )
        .await;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].pid, PostId(2));
    }

    #[tokio::test]
    async fn failed_lookup_keeps_implicit_groups_only() {
        let mut groups = MockGroupService::new();
        groups
            .expect_get_user_groups()
            .returning(|_| Err(DomainError::Internal("timeout".into())));

        let viewer_groups = ViewerGroups::resolve(UserId(4), &groups).await;
        assert!(viewer_groups.contains(REGISTERED_USERS));
        assert!(viewer_groups.contains(ALL));
        assert!(!viewer_groups.contains("editors"));
    }
}
