//! # Post visibility
//!
//! Audience checks on the write path and audience filtering on the read
//! path. Both take the actor or viewer explicitly.

mod predicate;
mod validator;

pub use predicate::{filter_visible, is_visible, ViewerGroups};
pub use validator::validate_audience;
