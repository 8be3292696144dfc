//! Record and sorted-set ports: posts, topics, categories, users.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{
    Category, CategoryId, CategoryRepo, DomainError, DomainResult, Post, PostId, PostPatch,
    PostRepo, PostSet, StoredFlag, Topic, TopicId, TopicRepo, UserId, UserProfile, UserRepo,
};
use tracing::{debug, instrument};

use super::{category_topics_key, InMemoryForum, ALL_TOPICS};

#[async_trait]
impl PostRepo for InMemoryForum {
    async fn next_pid(&self) -> DomainResult<PostId> {
        Ok(PostId(Self::next_id(&self.pid_seq)))
    }

    #[instrument(skip(self, post), fields(pid = %post.pid, tid = %post.tid))]
    async fn insert_post(&self, post: &Post) -> DomainResult<()> {
        let pid = post.pid.get();
        self.posts.insert(post.pid, post.clone());

        self.add_to_set(PostSet::All.key(), post.timestamp, pid);
        self.add_to_set(PostSet::Topic(post.tid).key(), post.timestamp, pid);
        if let Some(cid) = post.cid {
            self.add_to_set(PostSet::Category(cid).key(), post.timestamp, pid);
        }
        debug!("post stored");
        Ok(())
    }

    async fn get_post(&self, pid: PostId) -> DomainResult<Option<Post>> {
        Ok(self.posts.get(&pid).map(|post| post.clone()))
    }

    async fn get_posts(&self, pids: &[PostId]) -> DomainResult<Vec<Option<Post>>> {
        Ok(pids
            .iter()
            .map(|pid| self.posts.get(pid).map(|post| post.clone()))
            .collect())
    }

    async fn get_anonymous_flags(&self, pids: &[PostId]) -> DomainResult<Vec<Option<StoredFlag>>> {
        Ok(pids
            .iter()
            .map(|pid| self.posts.get(pid).and_then(|post| post.anonymous.clone()))
            .collect())
    }

    async fn range(
        &self,
        set: PostSet,
        start: i64,
        stop: i64,
        reverse: bool,
    ) -> DomainResult<Vec<PostId>> {
        Ok(self
            .set_range(&set.key(), start, stop, reverse)
            .into_iter()
            .map(PostId)
            .collect())
    }

    async fn range_by_score(
        &self,
        set: PostSet,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<PostId>> {
        Ok(self
            .set_range_by_score(&set.key(), from, to)
            .into_iter()
            .map(PostId)
            .collect())
    }

    async fn add_reply(
        &self,
        to_pid: PostId,
        pid: PostId,
        timestamp: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.add_to_set(PostSet::Replies(to_pid).key(), timestamp, pid.get());
        if let Some(mut target) = self.posts.get_mut(&to_pid) {
            target.replies += 1;
        }
        Ok(())
    }

    async fn patch_post(&self, pid: PostId, patch: PostPatch) -> DomainResult<()> {
        let mut post = self
            .posts
            .get_mut(&pid)
            .ok_or_else(|| DomainError::NotFound("post", pid.to_string()))?;
        if let Some(visible_to) = patch.visible_to {
            post.visible_to = Some(visible_to);
        }
        if let Some(anonymous) = patch.anonymous {
            post.anonymous = Some(anonymous);
        }
        Ok(())
    }
}

#[async_trait]
impl TopicRepo for InMemoryForum {
    async fn next_tid(&self) -> DomainResult<TopicId> {
        Ok(TopicId(Self::next_id(&self.tid_seq)))
    }

    #[instrument(skip(self, topic), fields(tid = %topic.tid, cid = %topic.cid))]
    async fn insert_topic(&self, topic: &Topic) -> DomainResult<()> {
        let tid = topic.tid.get();
        self.topics.insert(topic.tid, topic.clone());
        self.add_to_set(ALL_TOPICS.to_string(), topic.timestamp, tid);
        self.add_to_set(category_topics_key(topic.cid), topic.timestamp, tid);

        if let Some(mut category) = self.categories.get_mut(&topic.cid) {
            category.topic_count += 1;
        }
        debug!("topic stored");
        Ok(())
    }

    async fn get_topic(&self, tid: TopicId) -> DomainResult<Option<Topic>> {
        Ok(self.topics.get(&tid).map(|topic| topic.clone()))
    }

    async fn get_topics(&self, tids: &[TopicId]) -> DomainResult<Vec<Option<Topic>>> {
        Ok(tids
            .iter()
            .map(|tid| self.topics.get(tid).map(|topic| topic.clone()))
            .collect())
    }

    async fn category_tids(&self, cid: CategoryId) -> DomainResult<Vec<TopicId>> {
        Ok(self
            .set_range(&category_topics_key(cid), 0, -1, false)
            .into_iter()
            .map(TopicId)
            .collect())
    }

    async fn tids_by_time(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<TopicId>> {
        Ok(self
            .set_range_by_score(ALL_TOPICS, from, to)
            .into_iter()
            .map(TopicId)
            .collect())
    }

    async fn on_new_post(&self, post: &Post) -> DomainResult<()> {
        let mut topic = self
            .topics
            .get_mut(&post.tid)
            .ok_or_else(|| DomainError::NotFound("topic", post.tid.to_string()))?;
        topic.post_count += 1;
        topic.last_post_time = topic.last_post_time.max(post.timestamp);
        topic.main_pid.get_or_insert(post.pid);
        Ok(())
    }
}

impl InMemoryForum {
    fn children_of(&self, parent: CategoryId) -> Vec<CategoryId> {
        let mut children: Vec<(i64, CategoryId)> = self
            .categories
            .iter()
            .filter(|entry| entry.parent_cid == parent && entry.cid != parent)
            .map(|entry| (entry.order, entry.cid))
            .collect();
        children.sort();
        children.into_iter().map(|(_, cid)| cid).collect()
    }
}

#[async_trait]
impl CategoryRepo for InMemoryForum {
    async fn children_cids(&self, cid: CategoryId) -> DomainResult<Vec<CategoryId>> {
        Ok(self.children_of(cid))
    }

    async fn descendant_cids(&self, cid: CategoryId) -> DomainResult<Vec<CategoryId>> {
        let mut found = Vec::new();
        let mut queue = VecDeque::from([cid]);
        while let Some(parent) = queue.pop_front() {
            for child in self.children_of(parent) {
                if child != cid && !found.contains(&child) {
                    found.push(child);
                    queue.push_back(child);
                }
            }
        }
        Ok(found)
    }

    async fn get_categories(&self, cids: &[CategoryId]) -> DomainResult<Vec<Option<Category>>> {
        Ok(cids
            .iter()
            .map(|cid| self.categories.get(cid).map(|category| category.clone()))
            .collect())
    }

    async fn on_new_post(&self, cid: CategoryId, _post: &Post) -> DomainResult<()> {
        let mut category = self
            .categories
            .get_mut(&cid)
            .ok_or_else(|| DomainError::NotFound("category", cid.to_string()))?;
        category.post_count += 1;
        Ok(())
    }
}

#[async_trait]
impl UserRepo for InMemoryForum {
    async fn get_profiles(&self, uids: &[UserId]) -> DomainResult<Vec<Option<UserProfile>>> {
        Ok(uids
            .iter()
            .map(|uid| self.users.get(uid).map(|profile| profile.clone()))
            .collect())
    }
}
