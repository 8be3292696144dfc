//! # domains
//!
//! Models, errors and port traits shared by every layer of rusty-forum.
//! Nothing in here performs I/O; the ports describe what the services need
//! from storage, group membership and privilege lookups.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
pub use models::*;
pub use ports::*;
