//! # DomainError
//!
//! Centralized error handling for rusty-forum.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all domain and service operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An unauthenticated actor asked for a non-public audience.
    #[error("guests can't create restricted posts")]
    GuestRestrictedPost,

    /// One or more requested audience groups do not exist.
    #[error("groups do not exist: {}", .0.join(", "))]
    UnknownGroups(Vec<String>),

    #[error("invalid uid")]
    InvalidUid,

    /// Reply target is malformed, missing, or deleted.
    #[error("invalid pid")]
    InvalidPid,

    /// Date filters accept `YYYY-MM-DD` only.
    #[error("invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    /// Request payload failed validation (e.g., empty content)
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Resource not found (e.g., Topic, Category, Post)
    #[error("{0} not found with ID {1}")]
    NotFound(&'static str, String),

    #[error("topic is locked")]
    TopicLocked,

    /// Infrastructure failure (e.g., store unavailable)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Stable, translatable key surfaced to clients.
    pub fn key(&self) -> String {
        match self {
            Self::GuestRestrictedPost => "[[error:guests-cant-create-restricted-posts]]".into(),
            Self::UnknownGroups(names) => {
                format!("[[error:groups-do-not-exist, {}]]", names.join(", "))
            }
            Self::InvalidUid => "[[error:invalid-uid]]".into(),
            Self::InvalidPid => "[[error:invalid-pid]]".into(),
            Self::InvalidDate(_) => "[[error:invalid-date]]".into(),
            Self::InvalidData(_) => "[[error:invalid-data]]".into(),
            Self::NotFound(kind, _) => format!("[[error:no-{kind}]]"),
            Self::TopicLocked => "[[error:topic-locked]]".into(),
            Self::Internal(_) => "[[error:internal-error]]".into(),
        }
    }
}

/// A specialized Result type for rusty-forum logic.
pub type DomainResult<T> = std::result::Result<T, DomainError>;
