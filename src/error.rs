#![warn(clippy::all, clippy::pedantic)]

use thiserror::Error;

/// Failures reported by a bookmark repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("bookmark store unavailable: {0}")]
    Unavailable(String),

    #[error("bookmark not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid bookmark: {0}")]
    InvalidBookmark(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Failures surfaced by [`crate::Resolver::resolve`]
///
/// An unmatched command is never an error; only a repository that cannot be
/// queried is.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("bookmark lookup unavailable")]
    LookupUnavailable(#[source] RepositoryError),
}
