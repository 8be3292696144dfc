//! Demo content for a fresh in-memory forum: a few accounts, a restricted
//! beta group, a small category tree, and posts exercising audiences and
//! anonymous authorship.

use anyhow::Result;
use domains::{Category, CategoryId, NewReply, NewTopic, UserId, UserProfile, ADMINISTRATORS};
use services::ForumServices;
use storage_adapters::InMemoryForum;
use tracing::info;

const ADMIN: UserId = UserId(1);
const ALICE: UserId = UserId(2);
const BOB: UserId = UserId(3);

fn category(cid: u64, parent: u64, order: i64, name: &str, description: &str) -> Category {
    Category {
        cid: CategoryId(cid),
        parent_cid: CategoryId(parent),
        name: name.to_string(),
        slug: format!("{cid}/{}", name.to_lowercase().replace(' ', "-")),
        description: Some(description.to_string()),
        order,
        topic_count: 0,
        post_count: 0,
        teaser: None,
        children: Vec::new(),
    }
}

pub async fn demo(store: &InMemoryForum, forum: &ForumServices) -> Result<()> {
    for (uid, name) in [(ADMIN, "admin"), (ALICE, "alice"), (BOB, "bob")] {
        store.add_user(UserProfile::new(uid, name));
    }
    store.join_group(ADMINISTRATORS, ADMIN);
    store.join_group("beta-testers", ALICE);

    store.add_category(category(1, 0, 1, "Announcements", "News from the team"));
    store.add_category(category(2, 0, 2, "General Discussion", "Anything goes"));
    store.add_category(category(3, 2, 1, "Beta Program", "Early builds and feedback"));
    store.restrict_category(CategoryId(3), &["beta-testers"]);

    let welcome = forum
        .topics
        .post(NewTopic {
            uid: Some(ADMIN),
            cid: CategoryId(1),
            title: "Welcome to rusty-forum".into(),
            content: "Say hello in General Discussion.".into(),
            ..Default::default()
        })
        .await?;
    forum
        .topics
        .reply(NewReply {
            uid: Some(ALICE),
            tid: welcome.topic_data.tid,
            content: "Beta testers: the nightly build is up.".into(),
            visible_to: Some(vec!["beta-testers".into()]),
            ..Default::default()
        })
        .await?;
    forum
        .topics
        .post(NewTopic {
            uid: Some(BOB),
            cid: CategoryId(2),
            title: "Feedback on the new editor".into(),
            content: "Posted without my name on it.".into(),
            anonymous: true,
            ..Default::default()
        })
        .await?;

    info!("demo data seeded");
    Ok(())
}
