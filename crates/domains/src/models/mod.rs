//! # Domain Models
//!
//! These structs represent the core entities of rusty-forum. Identifiers are
//! numeric and allocated by the store's sequence counters.

pub mod audience;
pub mod category;
pub mod group;
pub mod ids;
pub mod post;
pub mod teaser;
pub mod topic;
pub mod user;

pub use audience::{
    requested_audience_from_json, Audience, ALL, LEGACY_AUDIENCE_IS_PUBLIC, REGISTERED_USERS,
};
pub use category::{build_tree, Category};
pub use group::{GroupName, GroupRecord, GroupRef, Privilege, ADMINISTRATORS, GLOBAL_MODERATORS};
pub use ids::{CategoryId, PostId, TopicId, UserId};
pub use post::{NewPost, Post, PostPatch, PostSet, StoredFlag};
pub use teaser::{Teaser, TeaserUser};
pub use topic::{slugify, NewReply, NewTopic, Topic};
pub use user::UserProfile;
