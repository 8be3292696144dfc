//! # services
//!
//! Business logic of rusty-forum. Every operation takes the acting or
//! viewing user explicitly; nothing reads ambient request state.

pub mod anonymity;
pub mod categories;
pub mod dates;
pub mod forum;
pub mod options;
pub mod posts;
pub mod topics;
pub mod upgrades;
pub mod visibility;

pub use anonymity::{mask_category_teasers, mask_if_anonymous};
pub use categories::{CategoryListing, CategoryService, Pagination};
pub use forum::ForumServices;
pub use options::ForumOptions;
pub use posts::PostService;
pub use topics::{TopicCreated, TopicService};
pub use visibility::{filter_visible, is_visible, validate_audience, ViewerGroups};
