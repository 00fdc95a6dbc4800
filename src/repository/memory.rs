use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use std::{
    collections::{BTreeMap, HashMap},
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use super::BookmarkRepository;
use crate::{Bookmark, NewBookmark, RepositoryError, normalize_command};

#[derive(Debug, Default)]
struct Store {
    bookmarks: BTreeMap<u64, Bookmark>,
    /// Canonical name -> bookmark id
    names: HashMap<String, u64>,
    /// Alias -> bookmark id
    aliases: HashMap<String, u64>,
    next_id: u64,
}

impl Store {
    /// Index a bookmark, rejecting anything that would break the namespace.
    fn add(&mut self, mut bookmark: Bookmark) -> Result<Bookmark, RepositoryError> {
        bookmark.name = normalize_command(&bookmark.name);
        if bookmark.name.is_empty() {
            return Err(RepositoryError::InvalidBookmark(
                "name must not be empty".to_string(),
            ));
        }
        if bookmark.url.trim().is_empty() {
            return Err(RepositoryError::InvalidBookmark(format!(
                "'{}' has no URL",
                bookmark.name
            )));
        }
        let Some(after) = bookmark.id.checked_add(1) else {
            return Err(RepositoryError::InvalidBookmark(format!(
                "'{}' has an id no further bookmark can follow",
                bookmark.name
            )));
        };
        if self.bookmarks.contains_key(&bookmark.id) {
            return Err(RepositoryError::Conflict(format!(
                "bookmark id {} is already in use",
                bookmark.id
            )));
        }

        let mut aliases: Vec<String> = Vec::with_capacity(bookmark.aliases.len());
        for alias in &bookmark.aliases {
            let alias = normalize_command(alias);
            if alias.is_empty() || aliases.contains(&alias) {
                continue;
            }
            aliases.push(alias);
        }
        bookmark.aliases = aliases;

        for command in bookmark.commands() {
            if self.names.contains_key(command) || self.aliases.contains_key(command) {
                return Err(RepositoryError::Conflict(format!(
                    "command '{command}' is already taken"
                )));
            }
        }
        if bookmark.aliases.contains(&bookmark.name) {
            return Err(RepositoryError::Conflict(format!(
                "alias '{}' collides with its own bookmark name",
                bookmark.name
            )));
        }

        self.names.insert(bookmark.name.clone(), bookmark.id);
        for alias in &bookmark.aliases {
            self.aliases.insert(alias.clone(), bookmark.id);
        }
        self.next_id = self.next_id.max(after);
        self.bookmarks.insert(bookmark.id, bookmark.clone());

        Ok(bookmark)
    }

    fn lookup(&self, command: &str) -> Option<&Bookmark> {
        self.names
            .get(command)
            .or_else(|| self.aliases.get(command))
            .and_then(|id| self.bookmarks.get(id))
    }
}

/// Bookmarks held in process memory
///
/// All reads and writes go through a single lock, so a lookup always sees a
/// bookmark together with its complete alias set.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    store: RwLock<Store>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from already stored bookmarks, keeping their ids
    /// and use counts.
    ///
    /// # Errors
    ///
    /// Returns an error if two bookmarks share an id or a command.
    pub fn from_bookmarks(bookmarks: Vec<Bookmark>) -> Result<Self, RepositoryError> {
        let repository = Self::new();
        for bookmark in bookmarks {
            repository.restore(bookmark)?;
        }
        Ok(repository)
    }

    /// Store a bookmark as is, keeping its id and use count.
    ///
    /// # Errors
    ///
    /// Returns an error if the id or one of its commands is already taken.
    pub fn restore(&self, bookmark: Bookmark) -> Result<Bookmark, RepositoryError> {
        self.write().add(bookmark)
    }

    /// Store a new bookmark and return it with its assigned id.
    ///
    /// Name and aliases are normalized; blank and repeated aliases are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, the URL is blank, or the name
    /// or an alias is already used anywhere in the namespace.
    pub fn insert(&self, new: NewBookmark) -> Result<Bookmark, RepositoryError> {
        let mut store = self.write();
        let bookmark = Bookmark {
            id: store.next_id.max(1),
            name: new.name,
            url: new.url,
            description: new.description,
            use_count: 0,
            aliases: new.aliases,
            created_at: Utc::now(),
        };
        let stored = store.add(bookmark)?;
        debug!("Stored bookmark '{}' (id {})", stored.name, stored.id);
        Ok(stored)
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<Bookmark> {
        self.read().bookmarks.get(&id).cloned()
    }

    /// All bookmarks ordered by name
    #[must_use]
    pub fn bookmarks(&self) -> Vec<Bookmark> {
        let mut bookmarks: Vec<Bookmark> = self.read().bookmarks.values().cloned().collect();
        bookmarks.sort_by(|a, b| a.name.cmp(&b.name));
        bookmarks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().bookmarks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().bookmarks.is_empty()
    }

    /// Remove every bookmark and alias
    pub fn clear(&self) {
        *self.write() = Store::default();
    }

    /// Swap in the contents of `other` under a single write lock, so readers
    /// see either the old bookmarks or the new ones.
    pub fn replace(&self, other: MemoryRepository) {
        let store = other.store.into_inner().unwrap_or_else(PoisonError::into_inner);
        *self.write() = store;
    }

    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BookmarkRepository for MemoryRepository {
    async fn find_by_name_or_alias(
        &self,
        command: &str,
    ) -> Result<Option<Bookmark>, RepositoryError> {
        Ok(self.read().lookup(command).cloned())
    }

    async fn increment_usage(&self, bookmark: &Bookmark) -> Result<(), RepositoryError> {
        let mut store = self.write();
        match store.bookmarks.get_mut(&bookmark.id) {
            Some(stored) => {
                stored.use_count += 1;
                Ok(())
            }
            None => Err(RepositoryError::NotFound(bookmark.name.clone())),
        }
    }

    async fn enumerate_all(&self) -> Result<Vec<Bookmark>, RepositoryError> {
        Ok(self.read().bookmarks.values().cloned().collect())
    }
}
