//! # storage-adapters
//!
//! Implementations of the `domains` ports. The `memory` adapter backs the
//! binary and the integration tests.

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "memory")]
pub use memory::InMemoryForum;
