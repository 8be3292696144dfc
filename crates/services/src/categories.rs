//! # CategoryService
//!
//! Assembles the paginated category listing: readable root categories,
//! their readable descendants as a tree, a teaser of the latest readable
//! post on every node, and anonymous authors masked last.

use std::sync::Arc;

use domains::{
    build_tree, Category, CategoryId, CategoryRepo, DomainResult, PermissionService, PostRepo,
    PostSet, Privilege, Teaser, TeaserUser, TopicRepo, UserId, UserProfile, UserRepo,
};
use futures_util::future::try_join_all;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::anonymity::mask_category_teasers;
use crate::options::ForumOptions;
use crate::posts::PostService;

/// Newest posts inspected per category when looking for a readable teaser.
const TEASER_SCAN: i64 = 20;

const GUEST_NAME: &str = "Guest";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub page_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryListing {
    pub categories: Vec<Category>,
    pub pagination: Pagination,
}

#[derive(Clone)]
pub struct CategoryService {
    posts: PostService,
    post_repo: Arc<dyn PostRepo>,
    topics: Arc<dyn TopicRepo>,
    categories: Arc<dyn CategoryRepo>,
    users: Arc<dyn UserRepo>,
    permissions: Arc<dyn PermissionService>,
    options: ForumOptions,
}

impl CategoryService {
    pub fn new(
        posts: PostService,
        post_repo: Arc<dyn PostRepo>,
        topics: Arc<dyn TopicRepo>,
        categories: Arc<dyn CategoryRepo>,
        users: Arc<dyn UserRepo>,
        permissions: Arc<dyn PermissionService>,
        options: ForumOptions,
    ) -> Self {
        Self {
            posts,
            post_repo,
            topics,
            categories,
            users,
            permissions,
            options,
        }
    }

    /// One page of the category listing as seen by `viewer`.
    #[instrument(skip(self))]
    pub async fn list(&self, viewer: UserId, page: Option<usize>) -> DomainResult<CategoryListing> {
        // 1. Readable roots, paginated
        let all_roots = self.categories.children_cids(CategoryId::ROOT).await?;
        let roots = self
            .permissions
            .filter_cids(Privilege::Find, &all_roots, viewer)
            .await?;

        let per_page = self.options.categories_per_page.max(1);
        let page_count = roots.len().div_ceil(per_page).max(1);
        let current_page = page.unwrap_or(1).clamp(1, page_count);
        let start = (current_page - 1) * per_page;
        let page_cids: Vec<CategoryId> = roots.iter().skip(start).take(per_page).copied().collect();

        // 2. Readable descendants
        let descendants: Vec<CategoryId> = try_join_all(
            page_cids
                .iter()
                .map(|cid| self.categories.descendant_cids(*cid)),
        )
        .await?
        .into_iter()
        .flatten()
        .collect();
        let child_cids = self
            .permissions
            .filter_cids(Privilege::Find, &descendants, viewer)
            .await?;

        // 3. Records and teasers
        let mut cids = page_cids;
        cids.extend(child_cids);
        let mut records: Vec<Category> = self
            .categories
            .get_categories(&cids)
            .await?
            .into_iter()
            .flatten()
            .collect();
        let teasers = try_join_all(records.iter().map(|c| self.teaser_for(c.cid, viewer))).await?;
        for (record, teaser) in records.iter_mut().zip(teasers) {
            record.teaser = teaser;
        }

        // 4. Tree, trimmed children, masked authors
        let mut tree = build_tree(records, CategoryId::ROOT);
        for root in tree.iter_mut() {
            root.children.truncate(self.options.sub_categories_per_page);
        }
        let masked = mask_category_teasers(
            &mut tree,
            viewer,
            self.post_repo.as_ref(),
            self.permissions.as_ref(),
            self.options.mask_node_budget,
        )
        .await;
        debug!(roots = tree.len(), masked, "category listing assembled");

        Ok(CategoryListing {
            categories: tree,
            pagination: Pagination {
                current_page,
                page_count,
            },
        })
    }

    /// Teaser of the newest post in `cid` that `viewer` may read.
    async fn teaser_for(&self, cid: CategoryId, viewer: UserId) -> DomainResult<Option<Teaser>> {
        let pids = self
            .post_repo
            .range(PostSet::Category(cid), 0, TEASER_SCAN - 1, true)
            .await?;
        let Some(post) = self.posts.get_posts_by_pids(&pids, viewer).await?.into_iter().next()
        else {
            return Ok(None);
        };
        let Some(topic) = self.topics.get_topic(post.tid).await? else {
            return Ok(None);
        };

        let mut teaser = Teaser::new(&post, &topic, None);
        teaser.user = if post.uid.is_guest() {
            let name = post.handle.as_deref().unwrap_or(GUEST_NAME);
            Some(TeaserUser::from(&UserProfile::new(UserId::GUEST, name)))
        } else {
            self.users
                .get_profiles(&[post.uid])
                .await?
                .into_iter()
                .flatten()
                .next()
                .as_ref()
                .map(TeaserUser::from)
        };
        Ok(Some(teaser))
    }
}
