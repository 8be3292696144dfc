//! # Ports
//!
//! Contracts the services depend on. Adapters in `storage-adapters`
//! implement them; tests substitute the generated `MockXxx` types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::DomainResult;
use crate::models::{
    Category, CategoryId, GroupRef, Post, PostId, PostPatch, PostSet, Privilege, StoredFlag,
    Topic, TopicId, UserId, UserProfile,
};

/// Group registry and membership lookups.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait GroupService: Send + Sync {
    /// Positional existence check, parallel to `names`.
    async fn exists(&self, names: &[String]) -> DomainResult<Vec<bool>>;

    /// Groups of each user, parallel to `uids`.
    async fn get_user_groups(&self, uids: &[UserId]) -> DomainResult<Vec<Vec<GroupRef>>>;
}

/// Privilege checks.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PermissionService: Send + Sync {
    async fn can(&self, privilege: Privilege, pid: PostId, uid: UserId) -> DomainResult<bool>;

    /// Keeps the topics `uid` holds `privilege` on, preserving order.
    async fn filter_tids(
        &self,
        privilege: Privilege,
        tids: &[TopicId],
        uid: UserId,
    ) -> DomainResult<Vec<TopicId>>;

    /// Keeps the categories `uid` holds `privilege` on, preserving order.
    async fn filter_cids(
        &self,
        privilege: Privilege,
        cids: &[CategoryId],
        uid: UserId,
    ) -> DomainResult<Vec<CategoryId>>;
}

/// Post persistence: field records plus time-scored pid sets.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepo: Send + Sync {
    /// Allocates the next pid from the global sequence.
    async fn next_pid(&self) -> DomainResult<PostId>;

    /// Stores the record and indexes it in every set it belongs to.
    async fn insert_post(&self, post: &Post) -> DomainResult<()>;

    async fn get_post(&self, pid: PostId) -> DomainResult<Option<Post>>;

    /// Positional bulk read; missing posts come back as `None`.
    async fn get_posts(&self, pids: &[PostId]) -> DomainResult<Vec<Option<Post>>>;

    /// Positional read of the raw `anonymous` field.
    async fn get_anonymous_flags(&self, pids: &[PostId]) -> DomainResult<Vec<Option<StoredFlag>>>;

    /// Rank range, inclusive. A negative `stop` counts from the end (`-1` = last).
    async fn range(
        &self,
        set: PostSet,
        start: i64,
        stop: i64,
        reverse: bool,
    ) -> DomainResult<Vec<PostId>>;

    /// Score range over post timestamps, inclusive on both ends, ascending.
    async fn range_by_score(
        &self,
        set: PostSet,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<PostId>>;

    /// Indexes `pid` as a reply to `to_pid` and bumps its reply counter.
    async fn add_reply(&self, to_pid: PostId, pid: PostId, timestamp: DateTime<Utc>)
        -> DomainResult<()>;

    async fn patch_post(&self, pid: PostId, patch: PostPatch) -> DomainResult<()>;
}

/// Topic persistence.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TopicRepo: Send + Sync {
    async fn next_tid(&self) -> DomainResult<TopicId>;

    async fn insert_topic(&self, topic: &Topic) -> DomainResult<()>;

    async fn get_topic(&self, tid: TopicId) -> DomainResult<Option<Topic>>;

    async fn get_topics(&self, tids: &[TopicId]) -> DomainResult<Vec<Option<Topic>>>;

    /// Topics of a category, oldest first.
    async fn category_tids(&self, cid: CategoryId) -> DomainResult<Vec<TopicId>>;

    /// Topics created inside `[from, to]`, oldest first.
    async fn tids_by_time(&self, from: DateTime<Utc>, to: DateTime<Utc>)
        -> DomainResult<Vec<TopicId>>;

    /// Bumps activity, post count and the main pid of the post's topic.
    async fn on_new_post(&self, post: &Post) -> DomainResult<()>;
}

/// Category persistence.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CategoryRepo: Send + Sync {
    /// Direct children of `cid` in display order.
    async fn children_cids(&self, cid: CategoryId) -> DomainResult<Vec<CategoryId>>;

    /// Every descendant of `cid`, breadth first.
    async fn descendant_cids(&self, cid: CategoryId) -> DomainResult<Vec<CategoryId>>;

    async fn get_categories(&self, cids: &[CategoryId]) -> DomainResult<Vec<Option<Category>>>;

    async fn on_new_post(&self, cid: CategoryId, post: &Post) -> DomainResult<()>;
}

/// Account lookups.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get_profiles(&self, uids: &[UserId]) -> DomainResult<Vec<Option<UserProfile>>>;
}
