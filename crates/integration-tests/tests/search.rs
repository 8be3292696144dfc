//! In-category search over titles, readable post contents and authors.

use domains::{CategoryId, TopicId, UserId};
use integration_tests::{march, TestForum, ALICE, BETA_TESTERS, BOB};

struct Seeded {
    fixture: TestForum,
    rust: TopicId,
    cooking: TopicId,
}

async fn seeded() -> Seeded {
    let fixture = TestForum::new();
    fixture.category(2, 0, "Elsewhere");

    let rust = fixture
        .topic(ALICE, 1, "Rust Ownership", "borrow checker rules", march(3, 9, 0, 0))
        .await
        .unwrap()
        .topic_data
        .tid;
    let cooking = fixture
        .topic(BOB, 1, "Cooking tips", "use a cast iron pan", march(3, 10, 0, 0))
        .await
        .unwrap()
        .topic_data
        .tid;
    fixture
        .reply(ALICE, cooking, "secret sauce recipe", Some(&[BETA_TESTERS]), march(3, 11, 0, 0))
        .await
        .unwrap();
    fixture
        .topic(BOB, 2, "Rust in another category", "off topic", march(3, 12, 0, 0))
        .await
        .unwrap();

    Seeded {
        fixture,
        rust,
        cooking,
    }
}

async fn search(seeded: &Seeded, term: &str, viewer: UserId) -> Vec<TopicId> {
    seeded
        .fixture
        .forum
        .topics
        .search_in_category(term, CategoryId(1), viewer)
        .await
        .unwrap()
        .into_iter()
        .map(|topic| topic.tid)
        .collect()
}

#[tokio::test]
async fn titles_match_case_insensitively() {
    let seeded = seeded().await;
    assert_eq!(search(&seeded, "rust", BOB).await, vec![seeded.rust]);
    assert_eq!(search(&seeded, "OWNERSHIP", BOB).await, vec![seeded.rust]);
}

#[tokio::test]
async fn contents_match_and_unrelated_topics_are_excluded() {
    let seeded = seeded().await;
    assert_eq!(search(&seeded, "Cast Iron", BOB).await, vec![seeded.cooking]);
    assert_eq!(search(&seeded, "borrow", UserId::GUEST).await, vec![seeded.rust]);
}

#[tokio::test]
async fn authors_match_by_username() {
    let seeded = seeded().await;
    // Bob cannot read Alice's restricted reply in the cooking topic.
    assert_eq!(search(&seeded, "alice", BOB).await, vec![seeded.rust]);
    // Alice can, and cooking saw the most recent activity.
    assert_eq!(search(&seeded, "alice", ALICE).await, vec![seeded.cooking, seeded.rust]);
}

#[tokio::test]
async fn restricted_contents_do_not_leak() {
    let seeded = seeded().await;
    assert!(search(&seeded, "secret sauce", BOB).await.is_empty());
    assert!(search(&seeded, "secret sauce", UserId::GUEST).await.is_empty());
    assert_eq!(search(&seeded, "secret sauce", ALICE).await, vec![seeded.cooking]);
}

#[tokio::test]
async fn no_match_and_blank_terms_are_empty() {
    let seeded = seeded().await;
    assert!(search(&seeded, "zebra", ALICE).await.is_empty());
    assert!(search(&seeded, "   ", ALICE).await.is_empty());
}

#[tokio::test]
async fn restricted_categories_return_nothing_to_outsiders() {
    let seeded = seeded().await;
    seeded.fixture.store.restrict_category(CategoryId(1), &[BETA_TESTERS]);

    assert!(search(&seeded, "rust", BOB).await.is_empty());
    assert_eq!(search(&seeded, "rust", ALICE).await, vec![seeded.rust]);
}

#[tokio::test]
async fn deleted_topics_are_skipped() {
    let seeded = seeded().await;
    seeded.fixture.store.set_topic_deleted(seeded.rust, true).unwrap();
    assert!(search(&seeded, "ownership", ALICE).await.is_empty());
}
