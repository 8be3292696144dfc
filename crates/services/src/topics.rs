//! # TopicService
//!
//! Topic creation and replies for the composer, plus the topic-level read
//! helpers: in-category search and date filtering.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use domains::{
    slugify, CategoryId, CategoryRepo, DomainError, DomainResult, GroupService, NewPost, NewReply,
    NewTopic, PermissionService, Post, PostRepo, PostSet, Privilege, Topic, TopicId, TopicRepo,
    UserId, UserRepo,
};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::dates::day_range;
use crate::posts::PostService;
use crate::visibility::validate_audience;

/// Result of creating a topic together with its main post.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicCreated {
    pub topic_data: Topic,
    pub post_data: Post,
}

#[derive(Clone)]
pub struct TopicService {
    posts: PostService,
    post_repo: Arc<dyn PostRepo>,
    topics: Arc<dyn TopicRepo>,
    categories: Arc<dyn CategoryRepo>,
    users: Arc<dyn UserRepo>,
    groups: Arc<dyn GroupService>,
    permissions: Arc<dyn PermissionService>,
}

impl TopicService {
    pub fn new(
        posts: PostService,
        post_repo: Arc<dyn PostRepo>,
        topics: Arc<dyn TopicRepo>,
        categories: Arc<dyn CategoryRepo>,
        users: Arc<dyn UserRepo>,
        groups: Arc<dyn GroupService>,
        permissions: Arc<dyn PermissionService>,
    ) -> Self {
        Self {
            posts,
            post_repo,
            topics,
            categories,
            users,
            groups,
            permissions,
        }
    }

    /// Creates a topic in `data.cid` and its main post. The main post's
    /// audience is validated before the topic is written.
    #[instrument(skip(self, data), fields(cid = %data.cid))]
    pub async fn post(&self, data: NewTopic) -> DomainResult<TopicCreated> {
        let uid = data.uid.ok_or(DomainError::InvalidUid)?;
        let title = data.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::InvalidData("title".into()));
        }

        let category_exists = self
            .categories
            .get_categories(&[data.cid])
            .await?
            .into_iter()
            .flatten()
            .next()
            .is_some();
        if !category_exists {
            return Err(DomainError::NotFound("category", data.cid.to_string()));
        }

        let audience =
            validate_audience(data.visible_to.as_deref(), uid, self.groups.as_ref()).await?;

        let tid = self.topics.next_tid().await?;
        let timestamp = data.timestamp.unwrap_or_else(Utc::now);
        let topic = Topic {
            tid,
            cid: data.cid,
            uid,
            slug: slugify(tid, &title),
            title,
            main_pid: None,
            timestamp,
            last_post_time: timestamp,
            post_count: 0,
            locked: false,
            pinned: false,
            deleted: false,
        };
        self.topics.insert_topic(&topic).await?;
        info!(%tid, %uid, "topic created");

        let main = NewPost {
            uid: Some(uid),
            tid,
            content: data.content,
            timestamp: Some(timestamp),
            visible_to: data.visible_to,
            anonymous: data.anonymous,
            ip: data.ip,
            handle: data.handle,
            is_main: true,
            ..Default::default()
        };
        let post_data = self.posts.persist(main, uid, &topic, audience).await?;
        let topic_data = self.topics.get_topic(tid).await?.unwrap_or(topic);

        Ok(TopicCreated {
            topic_data,
            post_data,
        })
    }

    /// Adds a reply to an unlocked topic.
    #[instrument(skip(self, data), fields(tid = %data.tid))]
    pub async fn reply(&self, data: NewReply) -> DomainResult<Post> {
        let topic = self
            .topics
            .get_topic(data.tid)
            .await?
            .ok_or_else(|| DomainError::NotFound("topic", data.tid.to_string()))?;
        if topic.locked {
            return Err(DomainError::TopicLocked);
        }

        self.posts
            .create(NewPost {
                uid: data.uid,
                tid: data.tid,
                content: data.content,
                timestamp: data.timestamp,
                to_pid: data.to_pid,
                visible_to: data.visible_to,
                anonymous: data.anonymous,
                ip: data.ip,
                handle: data.handle,
                ..Default::default()
            })
            .await
    }

    /// Case-insensitive search of a category's topic titles, the contents of
    /// posts `viewer` may read, and the usernames of non-anonymous authors.
    /// Results are de-duplicated, limited to readable topics, and ordered by
    /// most recent activity.
    #[instrument(skip(self))]
    pub async fn search_in_category(
        &self,
        term: &str,
        cid: CategoryId,
        viewer: UserId,
    ) -> DomainResult<Vec<Topic>> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        // 1. Titles
        let tids = self.topics.category_tids(cid).await?;
        let mut hits: HashSet<TopicId> = self
            .topics
            .get_topics(&tids)
            .await?
            .into_iter()
            .flatten()
            .filter(|topic| topic.title.to_lowercase().contains(&needle))
            .map(|topic| topic.tid)
            .collect();

        // 2. Post contents and authors, restricted to what the viewer may read
        let pids = self.post_repo.range(PostSet::Category(cid), 0, -1, false).await?;
        let posts = self.posts.get_posts_by_pids(&pids, viewer).await?;

        let author_uids: Vec<UserId> = posts
            .iter()
            .filter(|post| !post.is_anonymous() && !post.uid.is_guest())
            .map(|post| post.uid)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let usernames: HashMap<UserId, String> = self
            .users
            .get_profiles(&author_uids)
            .await?
            .into_iter()
            .flatten()
            .map(|profile| (profile.uid, profile.username.to_lowercase()))
            .collect();

        for post in &posts {
            let content_hit = post.content.to_lowercase().contains(&needle);
            let author_hit = !post.is_anonymous()
                && usernames
                    .get(&post.uid)
                    .is_some_and(|name| name.contains(&needle));
            if content_hit || author_hit {
                hits.insert(post.tid);
            }
        }

        // 3. Readable topics, most recently active first
        let mut candidates: Vec<TopicId> = hits.into_iter().collect();
        candidates.sort();
        let readable = self
            .permissions
            .filter_tids(Privilege::TopicsRead, &candidates, viewer)
            .await?;
        let mut found: Vec<Topic> = self
            .topics
            .get_topics(&readable)
            .await?
            .into_iter()
            .flatten()
            .filter(|topic| !topic.deleted)
            .collect();
        found.sort_by(|a, b| b.last_post_time.cmp(&a.last_post_time).then(a.tid.cmp(&b.tid)));

        debug!(matches = found.len(), "category search finished");
        Ok(found)
    }

    /// Topics created on `date` (`YYYY-MM-DD`, UTC), optionally restricted to
    /// one category and, when a viewer is given, to topics it may read.
    #[instrument(skip(self))]
    pub async fn topics_by_date(
        &self,
        date: &str,
        cid: Option<CategoryId>,
        viewer: Option<UserId>,
    ) -> DomainResult<Vec<Topic>> {
        let (from, to) = day_range(date)?;
        let mut tids = self.topics.tids_by_time(from, to).await?;

        if let Some(cid) = cid {
            let in_category: HashSet<TopicId> =
                self.topics.category_tids(cid).await?.into_iter().collect();
            tids.retain(|tid| in_category.contains(tid));
        }

        if let Some(viewer) = viewer {
            tids = self
                .permissions
                .filter_tids(Privilege::TopicsRead, &tids, viewer)
                .await?;
        }

        Ok(self.topics.get_topics(&tids).await?.into_iter().flatten().collect())
    }
}
