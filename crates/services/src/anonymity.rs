//! # Anonymous authorship
//!
//! Hides the author of anonymous posts on teasers. The stored post is the
//! source of truth for the flag; the teaser itself is never trusted. Masking
//! is applied fresh on every read and never written back.

use domains::{
    Category, PermissionService, PostRepo, Privilege, Teaser, TeaserUser, UserId,
};
use futures_util::future::join_all;
use tracing::{debug, warn};

pub const ANONYMOUS_NAME: &str = "Anonymous";
pub const ANONYMOUS_ICON_TEXT: &str = "A";
pub const ANONYMOUS_ICON_BG: &str = "#888";

/// Upper bound on category nodes visited by [`mask_category_teasers`].
pub const DEFAULT_MASK_NODE_BUDGET: usize = 1_000;

/// Overwrites every identity field and alias on `user` with the sentinels.
pub fn anonymize(user: &mut TeaserUser) {
    user.uid = UserId::GUEST;
    user.username = ANONYMOUS_NAME.to_string();
    user.displayname = ANONYMOUS_NAME.to_string();
    user.userslug = None;
    user.picture = None;
    user.icon_text = ANONYMOUS_ICON_TEXT.to_string();
    user.icon_text_keyed = ANONYMOUS_ICON_TEXT.to_string();
    user.icon_bg_color = ANONYMOUS_ICON_BG.to_string();
    user.icon_bg_color_keyed = ANONYMOUS_ICON_BG.to_string();
    user.username_escaped = ANONYMOUS_NAME.to_string();
    user.displayname_escaped = ANONYMOUS_NAME.to_string();
    user.userslug_escaped = String::new();
}

/// Masks the author on `teaser` when its post is anonymous and `viewer` is
/// neither the author nor a moderator of the post. Returns whether the mask
/// was applied. Lookup failures leave the teaser untouched.
pub async fn mask_if_anonymous(
    teaser: &mut Teaser,
    viewer: UserId,
    posts: &dyn PostRepo,
    permissions: &dyn PermissionService,
) -> bool {
    let Some(pid) = teaser.pid else {
        return false;
    };
    let Some(user) = teaser.user.as_mut() else {
        return false;
    };

    let post = match posts.get_post(pid).await {
        Ok(Some(post)) => post,
        Ok(None) => return false,
        Err(err) => {
            warn!(%pid, error = %err, "teaser post lookup failed, leaving author visible");
            return false;
        }
    };
    if !post.is_anonymous() {
        return false;
    }

    if !viewer.is_guest() && viewer == post.uid {
        return false;
    }
    match permissions.can(Privilege::PostsModerate, pid, viewer).await {
        Ok(true) => return false,
        Ok(false) => {}
        Err(err) => {
            warn!(%pid, error = %err, "moderation check failed, leaving author visible");
            return false;
        }
    }

    anonymize(user);
    debug!(%pid, uid = %viewer, "teaser author masked");
    true
}

/// Masks the teasers of every node in `tree`, children included. Nodes are
/// collected with an explicit walk that stops after `budget` nodes; the
/// collected teasers are masked concurrently. Returns how many were masked.
pub async fn mask_category_teasers(
    tree: &mut [Category],
    viewer: UserId,
    posts: &dyn PostRepo,
    permissions: &dyn PermissionService,
    budget: usize,
) -> usize {
    let mut teasers: Vec<&mut Teaser> = Vec::new();
    let mut stack: Vec<&mut Category> = tree.iter_mut().rev().collect();
    let mut visited = 0usize;

    while let Some(node) = stack.pop() {
        if visited == budget {
            warn!(budget, "category tree exceeds masking budget, remaining teasers skipped");
            break;
        }
        visited += 1;

        let Category {
            teaser, children, ..
        } = node;
        if let Some(teaser) = teaser.as_mut() {
            teasers.push(teaser);
        }
        stack.extend(children.iter_mut().rev());
    }

    let results = join_all(
        teasers
            .into_iter()
            .map(|teaser| mask_if_anonymous(teaser, viewer, posts, permissions)),
    )
    .await;
    results.into_iter().filter(|masked| *masked).count()
}
