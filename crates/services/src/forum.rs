//! Wires the three services over one store implementing every port.

use std::sync::Arc;

use domains::{CategoryRepo, GroupService, PermissionService, PostRepo, TopicRepo, UserRepo};

use crate::categories::CategoryService;
use crate::options::ForumOptions;
use crate::posts::PostService;
use crate::topics::TopicService;

#[derive(Clone)]
pub struct ForumServices {
    pub posts: PostService,
    pub topics: TopicService,
    pub categories: CategoryService,
}

impl ForumServices {
    pub fn new<S>(store: Arc<S>, options: ForumOptions) -> Self
    where
        S: PostRepo + TopicRepo + CategoryRepo + UserRepo + GroupService + PermissionService + 'static,
    {
        let post_repo: Arc<dyn PostRepo> = store.clone();
        let topic_repo: Arc<dyn TopicRepo> = store.clone();
        let category_repo: Arc<dyn CategoryRepo> = store.clone();
        let user_repo: Arc<dyn UserRepo> = store.clone();
        let groups: Arc<dyn GroupService> = store.clone();
        let permissions: Arc<dyn PermissionService> = store;

        let posts = PostService::new(
            post_repo.clone(),
            topic_repo.clone(),
            category_repo.clone(),
            groups.clone(),
            permissions.clone(),
            options.clone(),
        );
        let topics = TopicService::new(
            posts.clone(),
            post_repo.clone(),
            topic_repo.clone(),
            category_repo.clone(),
            user_repo.clone(),
            groups,
            permissions.clone(),
        );
        let categories = CategoryService::new(
            posts.clone(),
            post_repo,
            topic_repo,
            category_repo,
            user_repo,
            permissions,
            options,
        );

        Self {
            posts,
            topics,
            categories,
        }
    }
}
