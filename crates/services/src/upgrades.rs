//! # Data upgrades
//!
//! One-off backfills for fields added after posts already existed. Both walk
//! the all-posts set in fixed-size batches and only touch posts that lack the
//! field, so re-running them is harmless.

use domains::{Audience, DomainResult, Post, PostPatch, PostRepo, PostSet, StoredFlag};
use tracing::{debug, info};

pub const UPGRADE_BATCH: i64 = 500;

/// Gives every post without a stored audience the public audience.
pub async fn backfill_visible_to(posts: &dyn PostRepo) -> DomainResult<usize> {
    let public = Audience::public().to_stored();
    let updated = for_each_batch(posts, |post| {
        post.visible_to.is_none().then(|| PostPatch {
            visible_to: Some(public.clone()),
            ..PostPatch::default()
        })
    })
    .await?;
    info!(updated, "visibleTo backfill finished");
    Ok(updated)
}

/// Gives every post without an `anonymous` flag the value `false`.
pub async fn backfill_anonymous(posts: &dyn PostRepo) -> DomainResult<usize> {
    let updated = for_each_batch(posts, |post| {
        post.anonymous.is_none().then(|| PostPatch {
            anonymous: Some(StoredFlag::Bool(false)),
            ..PostPatch::default()
        })
    })
    .await?;
    info!(updated, "anonymous backfill finished");
    Ok(updated)
}

async fn for_each_batch<F>(posts: &dyn PostRepo, mut patch_for: F) -> DomainResult<usize>
where
    F: FnMut(&Post) -> Option<PostPatch>,
{
    let mut start = 0;
    let mut updated = 0;
    loop {
        let pids = posts
            .range(PostSet::All, start, start + UPGRADE_BATCH - 1, false)
            .await?;
        if pids.is_empty() {
            break;
        }

        for post in posts.get_posts(&pids).await?.into_iter().flatten() {
            if let Some(patch) = patch_for(&post) {
                posts.patch_post(post.pid, patch).await?;
                updated += 1;
            }
        }
        debug!(start, batch = pids.len(), "upgrade batch processed");
        start += UPGRADE_BATCH;
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::{MockPostRepo, PostId, TopicId, UserId};

    fn legacy(pid: u64, visible_to: Option<&str>, anonymous: Option<bool>) -> Post {
        Post {
            pid: PostId(pid),
            uid: UserId(1),
            tid: TopicId(1),
            cid: None,
            content: String::new(),
            source_content: None,
            timestamp: Utc::now(),
            visible_to: visible_to.map(str::to_string),
            anonymous: anonymous.map(StoredFlag::Bool),
            to_pid: None,
            ip: None,
            handle: None,
            deleted: false,
            replies: 0,
        }
    }

    #[tokio::test]
    async fn only_posts_missing_the_field_are_patched() {
        let mut posts = MockPostRepo::new();
        posts.expect_range().returning(|_, start, _, _| {
            Ok(if start == 0 { vec![PostId(1), PostId(2)] } else { Vec::new() })
        });
        posts.expect_get_posts().returning(|_| {
            Ok(vec![
                Some(legacy(1, None, Some(true))),
                Some(legacy(2, Some(r#"["editors"]"#), None)),
            ])
        });
        posts
            .expect_patch_post()
            .withf(|pid, patch| {
                *pid == PostId(1) && patch.visible_to.as_deref() == Some(r#"["all"]"#)
            })
            .times(1)
            .returning(|_, _| Ok(()));

        assert_eq!(backfill_visible_to(&posts).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn anonymous_backfill_defaults_to_false() {
        let mut posts = MockPostRepo::new();
        posts.expect_range().returning(|_, start, _, _| {
            Ok(if start == 0 { vec![PostId(1), PostId(2)] } else { Vec::new() })
        });
        posts.expect_get_posts().returning(|_| {
            Ok(vec![
                Some(legacy(1, None, Some(true))),
                Some(legacy(2, None, None)),
            ])
        });
        posts
            .expect_patch_post()
            .withf(|pid, patch| {
                *pid == PostId(2) && patch.anonymous == Some(StoredFlag::Bool(false))
            })
            .times(1)
            .returning(|_, _| Ok(()));

        assert_eq!(backfill_anonymous(&posts).await.unwrap(), 1);
    }
}
