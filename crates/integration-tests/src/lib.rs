//! # Test fixtures
//!
//! A seeded in-memory forum shared by the integration tests: one store,
//! the wired services, and helpers to create users, categories, topics and
//! replies with fixed timestamps.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use chrono::{DateTime, NaiveDate, Utc};
use domains::{
    Category, CategoryId, NewReply, NewTopic, Post, TopicId, UserId, UserProfile,
};
use services::{ForumOptions, ForumServices, TopicCreated};
use storage_adapters::InMemoryForum;

pub const ALICE: UserId = UserId(1);
pub const BOB: UserId = UserId(2);
pub const MODERATOR: UserId = UserId(3);
pub const BETA_TESTERS: &str = "beta-testers";

/// `2024-03-{day}T{h}:{m}:{s}Z`
pub fn march(day: u32, h: u32, m: u32, s: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .and_then(|date| date.and_hms_opt(h, m, s))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

pub struct TestForum {
    pub store: Arc<InMemoryForum>,
    pub forum: ForumServices,
}

impl Default for TestForum {
    fn default() -> Self {
        Self::new()
    }
}

impl TestForum {
    /// Alice (member of `beta-testers`), Bob (no groups), a global
    /// moderator, and a `General` root category with cid 1.
    pub fn new() -> Self {
        Self::with_options(ForumOptions::default())
    }

    pub fn with_options(options: ForumOptions) -> Self {
        let store = Arc::new(InMemoryForum::new());
        store.add_user(UserProfile::new(ALICE, "alice"));
        store.add_user(UserProfile::new(BOB, "bob"));
        store.add_user(UserProfile::new(MODERATOR, "mod"));
        store.join_group(BETA_TESTERS, ALICE);
        store.join_group(domains::GLOBAL_MODERATORS, MODERATOR);

        let forum = ForumServices::new(store.clone(), options);
        let fixture = Self { store, forum };
        fixture.category(1, 0, "General");
        fixture
    }

    pub fn router(&self) -> Router {
        api_adapters::router(api_adapters::AppState::new(self.forum.clone()))
    }

    pub fn category(&self, cid: u64, parent: u64, name: &str) {
        self.store.add_category(Category {
            cid: CategoryId(cid),
            parent_cid: CategoryId(parent),
            name: name.to_string(),
            slug: format!("{cid}/{}", name.to_lowercase()),
            description: None,
            order: cid as i64,
            topic_count: 0,
            post_count: 0,
            teaser: None,
            children: Vec::new(),
        });
    }

    pub async fn topic(
        &self,
        uid: UserId,
        cid: u64,
        title: &str,
        content: &str,
        at: DateTime<Utc>,
    ) -> Result<TopicCreated> {
        Ok(self
            .forum
            .topics
            .post(NewTopic {
                uid: Some(uid),
                cid: CategoryId(cid),
                title: title.to_string(),
                content: content.to_string(),
                timestamp: Some(at),
                ..Default::default()
            })
            .await?)
    }

    pub async fn anonymous_topic(
        &self,
        uid: UserId,
        cid: u64,
        title: &str,
        at: DateTime<Utc>,
    ) -> Result<TopicCreated> {
        Ok(self
            .forum
            .topics
            .post(NewTopic {
                uid: Some(uid),
                cid: CategoryId(cid),
                title: title.to_string(),
                content: "posted anonymously".to_string(),
                anonymous: true,
                timestamp: Some(at),
                ..Default::default()
            })
            .await?)
    }

    /// Reply restricted to `audience` when given.
    pub async fn reply(
        &self,
        uid: UserId,
        tid: TopicId,
        content: &str,
        audience: Option<&[&str]>,
        at: DateTime<Utc>,
    ) -> Result<Post> {
        Ok(self
            .forum
            .topics
            .reply(NewReply {
                uid: Some(uid),
                tid,
                content: content.to_string(),
                visible_to: audience.map(|groups| groups.iter().map(|g| g.to_string()).collect()),
                timestamp: Some(at),
                ..Default::default()
            })
            .await?)
    }
}
