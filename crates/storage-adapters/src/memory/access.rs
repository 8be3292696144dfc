//! Group registry and privilege checks.
//!
//! Administrators hold everything. Moderation privileges also go to the
//! global moderators and to per-category moderators. Read privileges are
//! open unless the category is restricted to a list of groups.

use async_trait::async_trait;
use domains::{
    CategoryId, DomainResult, GroupRecord, GroupRef, GroupService, PermissionService, PostId,
    Privilege, TopicId, UserId, ADMINISTRATORS, GLOBAL_MODERATORS,
};

use super::InMemoryForum;

impl InMemoryForum {
    fn is_admin(&self, uid: UserId) -> bool {
        !uid.is_guest() && self.is_member(ADMINISTRATORS, uid)
    }

    fn moderates(&self, cid: CategoryId, uid: UserId) -> bool {
        if uid.is_guest() {
            return false;
        }
        self.is_admin(uid)
            || self.is_member(GLOBAL_MODERATORS, uid)
            || self
                .category_moderators
                .get(&cid)
                .is_some_and(|mods| mods.contains(&uid))
    }

    fn can_read(&self, cid: CategoryId, uid: UserId) -> bool {
        if self.is_admin(uid) {
            return true;
        }
        match self.read_restrictions.get(&cid) {
            None => true,
            Some(allowed) => allowed.iter().any(|group| self.is_member(group, uid)),
        }
    }

    fn holds(&self, privilege: Privilege, cid: CategoryId, uid: UserId) -> bool {
        match privilege {
            Privilege::PostsModerate | Privilege::PostsViewDeleted => self.moderates(cid, uid),
            Privilege::TopicsRead | Privilege::Find => self.can_read(cid, uid),
        }
    }
}

#[async_trait]
impl GroupService for InMemoryForum {
    async fn exists(&self, names: &[String]) -> DomainResult<Vec<bool>> {
        Ok(names
            .iter()
            .map(|name| self.groups.contains_key(name))
            .collect())
    }

    async fn get_user_groups(&self, uids: &[UserId]) -> DomainResult<Vec<Vec<GroupRef>>> {
        let counts = self.member_counts();
        Ok(uids
            .iter()
            .map(|uid| {
                self.groups_of(*uid)
                    .into_iter()
                    .map(|name| {
                        GroupRef::Record(GroupRecord {
                            slug: Some(name.to_lowercase().replace(' ', "-")),
                            member_count: counts.get(&name).copied(),
                            name,
                        })
                    })
                    .collect()
            })
            .collect())
    }
}

#[async_trait]
impl PermissionService for InMemoryForum {
    async fn can(&self, privilege: Privilege, pid: PostId, uid: UserId) -> DomainResult<bool> {
        let cid = match self.posts.get(&pid) {
            Some(post) => post.cid,
            None => return Ok(false),
        };
        Ok(match cid {
            Some(cid) => self.holds(privilege, cid, uid),
            None => self.holds(privilege, CategoryId::ROOT, uid),
        })
    }

    async fn filter_tids(
        &self,
        privilege: Privilege,
        tids: &[TopicId],
        uid: UserId,
    ) -> DomainResult<Vec<TopicId>> {
        Ok(tids
            .iter()
            .copied()
            .filter(|tid| {
                let cid = match self.topics.get(tid) {
                    Some(topic) => topic.cid,
                    None => return false,
                };
                self.holds(privilege, cid, uid)
            })
            .collect())
    }

    async fn filter_cids(
        &self,
        privilege: Privilege,
        cids: &[CategoryId],
        uid: UserId,
    ) -> DomainResult<Vec<CategoryId>> {
        Ok(cids
            .iter()
            .copied()
            .filter(|cid| self.holds(privilege, *cid, uid))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::{GroupName, Post, PostRepo};

    fn post_in(pid: u64, cid: u64) -> Post {
        Post {
            pid: PostId(pid),
            uid: UserId(1),
            tid: TopicId(1),
            cid: Some(CategoryId(cid)),
            content: String::new(),
            source_content: None,
            timestamp: Utc::now(),
            visible_to: None,
            anonymous: None,
            to_pid: None,
            ip: None,
            handle: None,
            deleted: false,
            replies: 0,
        }
    }

    #[tokio::test]
    async fn existence_is_positional() {
        let forum = InMemoryForum::new();
        forum.create_group("editors");
        let found = forum
            .exists(&["ghost".to_string(), "editors".to_string()])
            .await
            .unwrap();
        assert_eq!(found, vec![false, true]);
    }

    #[tokio::test]
    async fn user_groups_come_back_as_records() {
        let forum = InMemoryForum::new();
        forum.join_group(GLOBAL_MODERATORS, UserId(2));

        let groups = forum.get_user_groups(&[UserId(2), UserId(3)]).await.unwrap();
        assert_eq!(groups[1], Vec::<GroupRef>::new());
        match &groups[0][0] {
            GroupRef::Record(record) => {
                assert_eq!(record.slug.as_deref(), Some("global-moderators"));
                assert_eq!(record.member_count, Some(1));
            }
            other => panic!("expected a record, got {other:?}"),
        }
        let name = groups[0][0].clone().into_name();
        assert_eq!(name, GroupName(GLOBAL_MODERATORS.into()));
    }

    #[tokio::test]
    async fn moderation_follows_group_and_category_assignments() {
        let forum = InMemoryForum::new();
        forum.join_group(ADMINISTRATORS, UserId(1));
        forum.join_group(GLOBAL_MODERATORS, UserId(2));
        forum.add_category_moderator(CategoryId(5), UserId(3));
        forum.insert_post(&post_in(10, 5)).await.unwrap();
        forum.insert_post(&post_in(11, 6)).await.unwrap();

        let moderate = |pid, uid| forum.can(Privilege::PostsModerate, PostId(pid), UserId(uid));
        assert!(moderate(10, 1).await.unwrap());
        assert!(moderate(10, 2).await.unwrap());
        assert!(moderate(10, 3).await.unwrap());
        assert!(!moderate(11, 3).await.unwrap());
        assert!(!moderate(10, 4).await.unwrap());
        assert!(!moderate(10, 0).await.unwrap());
        assert!(!moderate(99, 1).await.unwrap());
    }

    #[tokio::test]
    async fn restricted_categories_are_filtered_for_outsiders() {
        let forum = InMemoryForum::new();
        forum.join_group("staff", UserId(7));
        forum.restrict_category(CategoryId(2), &["staff"]);

        let cids = [CategoryId(1), CategoryId(2)];
        let outsider = forum.filter_cids(Privilege::Find, &cids, UserId(4)).await.unwrap();
        assert_eq!(outsider, vec![CategoryId(1)]);
        let insider = forum.filter_cids(Privilege::Find, &cids, UserId(7)).await.unwrap();
        assert_eq!(insider, cids.to_vec());
    }
}
