//! Day filters over posts and topics.

use domains::{CategoryId, DomainError, TopicId};
use integration_tests::{march, TestForum, ALICE, BETA_TESTERS, BOB};

async fn seeded() -> (TestForum, TopicId, TopicId) {
    let fixture = TestForum::new();
    fixture.category(2, 0, "News");

    let early = fixture
        .topic(ALICE, 1, "Midnight", "first second of the day", march(4, 0, 0, 0))
        .await
        .unwrap()
        .topic_data
        .tid;
    fixture
        .reply(BOB, early, "last second of the day", None, march(4, 23, 59, 59))
        .await
        .unwrap();
    fixture
        .reply(ALICE, early, "members only", Some(&[BETA_TESTERS]), march(4, 12, 0, 0))
        .await
        .unwrap();
    fixture
        .reply(BOB, early, "next day", None, march(5, 0, 0, 0))
        .await
        .unwrap();
    let news = fixture
        .topic(BOB, 2, "Announcement", "news body", march(4, 8, 0, 0))
        .await
        .unwrap()
        .topic_data
        .tid;

    (fixture, early, news)
}

#[tokio::test]
async fn posts_inside_the_day_only() {
    let (fixture, _, _) = seeded().await;

    let contents: Vec<String> = fixture
        .forum
        .posts
        .filter_by_date("2024-03-04", BOB)
        .await
        .unwrap()
        .into_iter()
        .map(|post| post.content)
        .collect();
    assert_eq!(
        contents,
        vec!["first second of the day", "news body", "last second of the day"]
    );
}

#[tokio::test]
async fn restricted_posts_follow_the_audience() {
    let (fixture, _, _) = seeded().await;
    let posts = fixture.forum.posts.filter_by_date("2024-03-04", ALICE).await.unwrap();
    assert!(posts.iter().any(|post| post.content == "members only"));
    assert_eq!(posts.len(), 4);
}

#[tokio::test]
async fn topics_by_day_and_category() {
    let (fixture, early, news) = seeded().await;
    let topics = &fixture.forum.topics;

    let all: Vec<TopicId> = topics
        .topics_by_date("2024-03-04", None, Some(BOB))
        .await
        .unwrap()
        .into_iter()
        .map(|topic| topic.tid)
        .collect();
    assert_eq!(all, vec![early, news]);

    let in_news: Vec<TopicId> = topics
        .topics_by_date("2024-03-04", Some(CategoryId(2)), None)
        .await
        .unwrap()
        .into_iter()
        .map(|topic| topic.tid)
        .collect();
    assert_eq!(in_news, vec![news]);

    assert!(topics
        .topics_by_date("2024-03-05", None, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn topics_in_unreadable_categories_are_dropped() {
    let (fixture, early, _) = seeded().await;
    fixture.store.restrict_category(CategoryId(2), &[BETA_TESTERS]);

    let seen: Vec<TopicId> = fixture
        .forum
        .topics
        .topics_by_date("2024-03-04", None, Some(BOB))
        .await
        .unwrap()
        .into_iter()
        .map(|topic| topic.tid)
        .collect();
    assert_eq!(seen, vec![early]);
}

#[tokio::test]
async fn malformed_dates_are_rejected() {
    let (fixture, _, _) = seeded().await;
    for date in ["2024-3-4", "04-03-2024", "2024-02-30", "yesterday", ""] {
        let err = fixture.forum.posts.filter_by_date(date, BOB).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidDate(_)), "{date}: {err:?}");
        let err = fixture
            .forum
            .topics
            .topics_by_date(date, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidDate(_)), "{date}: {err:?}");
    }
}
