//! # PostService
//!
//! Creation and retrieval of posts. Audience validation runs before anything
//! is written; visibility filtering runs after posts are loaded and before
//! any further annotation of the result set.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    Audience, CategoryRepo, DomainError, DomainResult, GroupService, NewPost, PermissionService,
    Post, PostId, PostRepo, PostSet, Privilege, StoredFlag, Topic, TopicRepo, UserId,
};
use futures_util::try_join;
use tracing::{debug, error, info, instrument, warn};

use crate::dates::day_range;
use crate::options::ForumOptions;
use crate::visibility::{filter_visible, validate_audience};

/// Content shown in place of a deleted post to viewers who may not see it.
pub const DELETED_PLACEHOLDER: &str = "[[topic:post-is-deleted]]";

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepo>,
    topics: Arc<dyn TopicRepo>,
    categories: Arc<dyn CategoryRepo>,
    groups: Arc<dyn GroupService>,
    permissions: Arc<dyn PermissionService>,
    options: ForumOptions,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepo>,
        topics: Arc<dyn TopicRepo>,
        categories: Arc<dyn CategoryRepo>,
        groups: Arc<dyn GroupService>,
        permissions: Arc<dyn PermissionService>,
        options: ForumOptions,
    ) -> Self {
        Self {
            posts,
            topics,
            categories,
            groups,
            permissions,
            options,
        }
    }

    /// Creates a post inside an existing topic.
    ///
    /// Nothing is persisted when the uid, reply target, audience, or topic
    /// is rejected.
    #[instrument(skip(self, data), fields(tid = %data.tid))]
    pub async fn create(&self, data: NewPost) -> DomainResult<Post> {
        let uid = data.uid.ok_or(DomainError::InvalidUid)?;

        // 1. Reply target must exist and be readable
        if let Some(to_pid) = data.to_pid {
            self.check_to_pid(to_pid, uid).await?;
        }

        // 2. Audience
        let audience =
            validate_audience(data.visible_to.as_deref(), uid, self.groups.as_ref()).await?;

        // 3. Owning topic
        let topic = self
            .topics
            .get_topic(data.tid)
            .await?
            .ok_or_else(|| DomainError::NotFound("topic", data.tid.to_string()))?;

        self.persist(data, uid, &topic, audience).await
    }

    /// Writes a post whose uid, reply target and audience were already checked.
    pub(crate) async fn persist(
        &self,
        data: NewPost,
        uid: UserId,
        topic: &Topic,
        audience: Audience,
    ) -> DomainResult<Post> {
        let pid = match data.pid {
            Some(pid) => pid,
            None => self.posts.next_pid().await?,
        };
        debug!(%pid, "pid allocated");

        let post = Post {
            pid,
            uid,
            tid: topic.tid,
            cid: Some(topic.cid),
            content: data.content,
            source_content: data.source_content,
            timestamp: data.timestamp.unwrap_or_else(Utc::now),
            visible_to: Some(audience.to_stored()),
            anonymous: Some(StoredFlag::Bool(data.anonymous)),
            to_pid: data.to_pid,
            ip: data.ip.filter(|_| self.options.track_ip_per_post),
            handle: data.handle.filter(|_| uid.is_guest()),
            deleted: false,
            replies: 0,
        };

        // Persistence, then bookkeeping on every index that lists the post
        self.posts.insert_post(&post).await?;
        try_join!(
            self.topics.on_new_post(&post),
            self.categories.on_new_post(topic.cid, &post),
            self.add_reply_to(&post),
        )?;

        info!(%pid, %uid, audience = %audience.to_stored(), "post created");
        Ok(post)
    }

    async fn add_reply_to(&self, post: &Post) -> DomainResult<()> {
        match post.to_pid {
            Some(to_pid) => self.posts.add_reply(to_pid, post.pid, post.timestamp).await,
            None => Ok(()),
        }
    }

    async fn check_to_pid(&self, to_pid: PostId, uid: UserId) -> DomainResult<()> {
        let (target, can_view_deleted) = try_join!(
            self.posts.get_post(to_pid),
            self.permissions.can(Privilege::PostsViewDeleted, to_pid, uid),
        )?;
        match target {
            Some(target) if !target.deleted || can_view_deleted => Ok(()),
            _ => {
                warn!(%to_pid, %uid, "reply target missing or deleted");
                Err(DomainError::InvalidPid)
            }
        }
    }

    /// Loads posts in `pids` order and keeps those `viewer` may read.
    /// Unknown pids are skipped.
    #[instrument(skip(self, pids), fields(count = pids.len()))]
    pub async fn get_posts_by_pids(&self, pids: &[PostId], viewer: UserId) -> DomainResult<Vec<Post>> {
        if pids.is_empty() {
            return Ok(Vec::new());
        }
        let loaded: Vec<Post> = self.posts.get_posts(pids).await?.into_iter().flatten().collect();
        Ok(filter_visible(loaded, viewer, self.groups.as_ref()).await)
    }

    /// Reads a rank range of `set` and returns the posts `viewer` may read,
    /// with the `anonymous` flag guaranteed present.
    #[instrument(skip(self))]
    pub async fn get_posts_from_set(
        &self,
        set: PostSet,
        start: i64,
        stop: i64,
        viewer: UserId,
        reverse: bool,
    ) -> DomainResult<Vec<Post>> {
        let pids = self.posts.range(set, start, stop, reverse).await?;
        let mut posts = self.get_posts_by_pids(&pids, viewer).await?;

        self.backfill_anonymous_flags(&mut posts).await;
        self.hide_deleted_contents(&mut posts, viewer).await;
        Ok(posts)
    }

    async fn backfill_anonymous_flags(&self, posts: &mut [Post]) {
        let missing: Vec<PostId> = posts
            .iter()
            .filter(|post| post.anonymous.is_none())
            .map(|post| post.pid)
            .collect();
        if missing.is_empty() {
            return;
        }

        warn!(pids = ?missing, "posts read without an anonymous flag");
        match self.posts.get_anonymous_flags(&missing).await {
            Ok(flags) => {
                for post in posts.iter_mut().filter(|post| post.anonymous.is_none()) {
                    let flag = missing
                        .iter()
                        .position(|pid| *pid == post.pid)
                        .and_then(|index| flags.get(index).cloned().flatten());
                    post.anonymous = Some(StoredFlag::Bool(flag.is_some_and(|f| f.is_set())));
                }
            }
            Err(err) => error!(error = %err, "failed to backfill anonymous flags on read"),
        }
    }

    async fn hide_deleted_contents(&self, posts: &mut [Post], viewer: UserId) {
        for post in posts.iter_mut().filter(|post| post.deleted) {
            let can_view_deleted = match self
                .permissions
                .can(Privilege::PostsViewDeleted, post.pid, viewer)
                .await
            {
                Ok(allowed) => allowed,
                Err(err) => {
                    warn!(pid = %post.pid, error = %err, "privilege lookup failed");
                    false
                }
            };
            Self::modify_post_by_privilege(post, viewer, can_view_deleted);
        }
    }

    /// Posts created on `date` (`YYYY-MM-DD`, UTC) that `viewer` may read.
    #[instrument(skip(self))]
    pub async fn filter_by_date(&self, date: &str, viewer: UserId) -> DomainResult<Vec<Post>> {
        let (from, to) = day_range(date)?;
        let pids = self.posts.range_by_score(PostSet::All, from, to).await?;
        debug!(candidates = pids.len(), "posts in day range");
        self.get_posts_by_pids(&pids, viewer).await
    }

    /// Replaces the content of a deleted post unless `viewer` wrote it or
    /// may view deleted posts.
    pub fn modify_post_by_privilege(post: &mut Post, viewer: UserId, can_view_deleted: bool) {
        let self_post = !viewer.is_guest() && post.uid == viewer;
        if post.deleted && !(self_post || can_view_deleted) {
            post.content = DELETED_PLACEHOLDER.to_string();
        }
    }
}
