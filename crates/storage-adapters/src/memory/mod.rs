//! # In-memory forum store
//!
//! Keeps every record in concurrent maps and mirrors the key/sorted-set
//! layout of the production store: records by id, plus time-scored sets
//! (`posts:pid`, `cid:{cid}:pids`, `tid:{tid}:posts`, `pid:{pid}:replies`,
//! `topics:tid`, `cid:{cid}:tids`). One [`InMemoryForum`] implements every
//! port, so a single `Arc` can be handed to all services.
//!
//! # Developer Note
//! No map guard is ever held across an `.await` or while another entry of
//! the same map is written; DashMap shards would deadlock otherwise.

mod access;
mod repos;
mod sorted_set;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use domains::{
    Category, CategoryId, DomainError, DomainResult, Post, PostId, Topic, TopicId, UserId,
    UserProfile, ADMINISTRATORS, GLOBAL_MODERATORS, REGISTERED_USERS,
};
use tracing::debug;

pub use sorted_set::ScoredSet;

/// Set of every topic, scored by creation time.
pub(crate) const ALL_TOPICS: &str = "topics:tid";

pub(crate) fn category_topics_key(cid: CategoryId) -> String {
    format!("cid:{cid}:tids")
}

pub(crate) fn score(timestamp: DateTime<Utc>) -> i64 {
    timestamp.timestamp_millis()
}

#[derive(Default)]
pub struct InMemoryForum {
    pub(crate) pid_seq: AtomicU64,
    pub(crate) tid_seq: AtomicU64,
    pub(crate) posts: DashMap<PostId, Post>,
    pub(crate) topics: DashMap<TopicId, Topic>,
    pub(crate) categories: DashMap<CategoryId, Category>,
    pub(crate) users: DashMap<UserId, UserProfile>,
    /// Group name -> members.
    pub(crate) groups: DashMap<String, BTreeSet<UserId>>,
    /// Categories readable only by members of the listed groups.
    pub(crate) read_restrictions: DashMap<CategoryId, HashSet<String>>,
    /// Per-category moderators on top of the global moderation groups.
    pub(crate) category_moderators: DashMap<CategoryId, HashSet<UserId>>,
    pub(crate) sets: DashMap<String, ScoredSet>,
}

impl InMemoryForum {
    /// A store that already knows the built-in system groups.
    pub fn new() -> Self {
        let forum = Self::default();
        for group in [ADMINISTRATORS, GLOBAL_MODERATORS, REGISTERED_USERS] {
            forum.create_group(group);
        }
        forum
    }

    // ── Seeding ───────────────────────────────────────────────────────────────

    pub fn add_user(&self, profile: UserProfile) {
        self.users.insert(profile.uid, profile);
    }

    pub fn create_group(&self, name: &str) {
        self.groups.entry(name.to_string()).or_default();
    }

    /// Adds `uid` to `name`, creating the group on first use.
    pub fn join_group(&self, name: &str, uid: UserId) {
        self.groups.entry(name.to_string()).or_default().insert(uid);
    }

    pub fn add_category(&self, category: Category) {
        debug!(cid = %category.cid, parent = %category.parent_cid, "category added");
        self.categories.insert(category.cid, category);
    }

    /// Limits reading `cid` to members of `groups` (administrators always read).
    pub fn restrict_category(&self, cid: CategoryId, groups: &[&str]) {
        self.read_restrictions
            .insert(cid, groups.iter().map(|g| g.to_string()).collect());
    }

    pub fn add_category_moderator(&self, cid: CategoryId, uid: UserId) {
        self.category_moderators.entry(cid).or_default().insert(uid);
    }

    // ── Moderation ────────────────────────────────────────────────────────────

    pub fn set_post_deleted(&self, pid: PostId, deleted: bool) -> DomainResult<()> {
        let mut post = self
            .posts
            .get_mut(&pid)
            .ok_or_else(|| DomainError::NotFound("post", pid.to_string()))?;
        post.deleted = deleted;
        Ok(())
    }

    pub fn set_topic_locked(&self, tid: TopicId, locked: bool) -> DomainResult<()> {
        let mut topic = self
            .topics
            .get_mut(&tid)
            .ok_or_else(|| DomainError::NotFound("topic", tid.to_string()))?;
        topic.locked = locked;
        Ok(())
    }

    pub fn set_topic_deleted(&self, tid: TopicId, deleted: bool) -> DomainResult<()> {
        let mut topic = self
            .topics
            .get_mut(&tid)
            .ok_or_else(|| DomainError::NotFound("topic", tid.to_string()))?;
        topic.deleted = deleted;
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    pub(crate) fn add_to_set(&self, key: String, timestamp: DateTime<Utc>, member: u64) {
        self.sets.entry(key).or_default().add(score(timestamp), member);
    }

    pub(crate) fn set_range(&self, key: &str, start: i64, stop: i64, reverse: bool) -> Vec<u64> {
        self.sets
            .get(key)
            .map(|set| set.range(start, stop, reverse))
            .unwrap_or_default()
    }

    pub(crate) fn set_range_by_score(
        &self,
        key: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<u64> {
        self.sets
            .get(key)
            .map(|set| set.range_by_score(score(from), score(to)))
            .unwrap_or_default()
    }

    /// Groups `uid` belongs to, sorted by name.
    pub(crate) fn groups_of(&self, uid: UserId) -> Vec<String> {
        let mut names: Vec<String> = self
            .groups
            .iter()
            .filter(|entry| entry.value().contains(&uid))
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    pub(crate) fn member_counts(&self) -> HashMap<String, u64> {
        self.groups
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().len() as u64))
            .collect()
    }

    pub(crate) fn is_member(&self, group: &str, uid: UserId) -> bool {
        self.groups
            .get(group)
            .is_some_and(|members| members.contains(&uid))
    }

    pub(crate) fn next_id(seq: &AtomicU64) -> u64 {
        seq.fetch_add(1, Ordering::SeqCst) + 1
    }
}
