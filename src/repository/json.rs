use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};
use tokio::sync::Mutex;

use super::{BookmarkRepository, MemoryRepository};
use crate::{Bookmark, NewBookmark, RepositoryError, seed};

/// On-disk layout of the bookmark store
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    bookmarks: Vec<Bookmark>,
}

/// Bookmarks kept in memory and written back to a JSON file after every change
#[derive(Debug)]
pub struct JsonFileRepository {
    inner: MemoryRepository,
    path: PathBuf,
    /// Serializes writers so an older snapshot never lands after a newer one
    save_lock: Mutex<()>,
}

impl JsonFileRepository {
    /// Load the store from `path`.
    ///
    /// A missing file is created and filled with the default bookmarks.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The store file exists but cannot be opened
    /// - The store file exists but cannot be parsed as valid JSON
    /// - The stored bookmarks violate namespace uniqueness
    /// - A new store cannot be written
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            let repository = Self::with_repository(MemoryRepository::new(), path);
            let count = seed::seed(&repository.inner)
                .context("Failed to seed a new bookmark store")?;
            repository.write_blocking()?;
            info!("Created bookmark store at {} with {count} bookmarks", path.display());
            return Ok(repository);
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open bookmark store at {}", path.display()))?;
        let stored: StoreFile = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse bookmark store at {}", path.display()))?;
        let count = stored.bookmarks.len();
        let inner = MemoryRepository::from_bookmarks(stored.bookmarks)
            .with_context(|| format!("Invalid bookmark store at {}", path.display()))?;

        debug!("Loaded {count} bookmarks from {}", path.display());
        Ok(Self::with_repository(inner, path))
    }

    fn with_repository(inner: MemoryRepository, path: &Path) -> Self {
        Self {
            inner,
            path: path.to_path_buf(),
            save_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All bookmarks ordered by name
    #[must_use]
    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.inner.bookmarks()
    }

    /// Store a new bookmark and persist the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the bookmark is rejected or the store cannot be
    /// written.
    pub async fn insert(&self, new: NewBookmark) -> Result<Bookmark, RepositoryError> {
        let stored = self.inner.insert(new)?;
        self.save().await?;
        Ok(stored)
    }

    /// Replace every bookmark with the default set and persist the store.
    ///
    /// Readers never observe a partially seeded store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn reset_to_seed(&self) -> Result<usize, RepositoryError> {
        let seeded = MemoryRepository::new();
        let count = seed::seed(&seeded)?;
        self.inner.replace(seeded);
        self.save().await?;
        Ok(count)
    }

    /// Write the current bookmarks to disk.
    ///
    /// The file is replaced atomically through a temporary sibling.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be serialized or written.
    pub async fn save(&self) -> Result<(), RepositoryError> {
        let _guard = self.save_lock.lock().await;
        let contents = self.encode()?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let staging = self.staging_path();
        tokio::fs::write(&staging, contents).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        debug!("Saved bookmark store to {}", self.path.display());
        Ok(())
    }

    fn write_blocking(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let contents = self.encode()?;
        fs::write(&self.path, contents).with_context(|| {
            format!("Failed to write bookmark store to {}", self.path.display())
        })?;
        Ok(())
    }

    fn encode(&self) -> Result<Vec<u8>, RepositoryError> {
        let stored = StoreFile {
            bookmarks: self.inner.bookmarks(),
        };
        Ok(serde_json::to_vec_pretty(&stored)?)
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl BookmarkRepository for JsonFileRepository {
    async fn find_by_name_or_alias(
        &self,
        command: &str,
    ) -> Result<Option<Bookmark>, RepositoryError> {
        self.inner.find_by_name_or_alias(command).await
    }

    async fn increment_usage(&self, bookmark: &Bookmark) -> Result<(), RepositoryError> {
        self.inner.increment_usage(bookmark).await?;
        self.save().await
    }

    async fn enumerate_all(&self) -> Result<Vec<Bookmark>, RepositoryError> {
        self.inner.enumerate_all().await
    }
}
