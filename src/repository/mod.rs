#![warn(clippy::all, clippy::pedantic)]

//! Storage seam for bookmarks.
//!
//! The resolver only needs three operations from storage: an exact lookup by
//! name or alias, a usage increment and a full enumeration for the fuzzy
//! index. Everything else about persistence lives behind this trait.

mod json;
mod memory;

use async_trait::async_trait;

use crate::{Bookmark, RepositoryError};

pub use json::JsonFileRepository;
pub use memory::MemoryRepository;

#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Find the bookmark whose canonical name, or failing that one of whose
    /// aliases, equals `command` exactly.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    async fn find_by_name_or_alias(
        &self,
        command: &str,
    ) -> Result<Option<Bookmark>, RepositoryError>;

    /// Increase the bookmark's use count by one.
    ///
    /// # Errors
    ///
    /// Returns an error if the bookmark no longer exists or the store cannot
    /// be updated.
    async fn increment_usage(&self, bookmark: &Bookmark) -> Result<(), RepositoryError>;

    /// Every bookmark together with its current aliases.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn enumerate_all(&self) -> Result<Vec<Bookmark>, RepositoryError>;
}
