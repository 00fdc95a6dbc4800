use async_trait::async_trait;
use chrono::Utc;
use std::sync::{
    Arc, Once,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use tokio::sync::Notify;

use crate::{Bookmark, BookmarkRepository, MemoryRepository, RepositoryError};

mod concurrency_tests;

// Setup logging for tests
static INIT: Once = Once::new();

pub fn setup_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// A stored bookmark pointing at `https://<name>.example/?q=%s`
pub fn bookmark(id: u64, name: &str, use_count: u64, aliases: &[&str]) -> Bookmark {
    Bookmark {
        id,
        name: name.to_string(),
        url: format!("https://{name}.example/?q=%s"),
        description: Some(format!("{name} search")),
        use_count,
        aliases: aliases.iter().map(ToString::to_string).collect(),
        created_at: Utc::now(),
    }
}

/// Four bookmarks with distinct use counts, three of them aliased
pub fn multiple_bookmarks() -> Arc<MemoryRepository> {
    let repository = MemoryRepository::from_bookmarks(vec![
        bookmark(1, "google", 100, &["g"]),
        bookmark(2, "github", 50, &["gh"]),
        bookmark(3, "gitlab", 10, &[]),
        bookmark(4, "stackoverflow", 75, &["so"]),
    ])
    .expect("fixture bookmarks are valid");
    Arc::new(repository)
}

/// In-memory repository that can be told to fail or to stall enumerations
#[derive(Debug, Default)]
pub struct FlakyRepository {
    inner: MemoryRepository,
    failing: AtomicBool,
    failing_increments: AtomicBool,
    holding: AtomicBool,
    gate: Notify,
    lookups: AtomicUsize,
    enumerations: AtomicUsize,
}

impl FlakyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bookmark: Bookmark) -> Result<Bookmark, RepositoryError> {
        self.inner.restore(bookmark)
    }

    /// Fail every operation
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fail usage increments only
    pub fn set_failing_increments(&self, failing: bool) {
        self.failing_increments.store(failing, Ordering::SeqCst);
    }

    /// Make enumerations wait until [`Self::release_enumeration`]
    pub fn hold_enumerations(&self) {
        self.holding.store(true, Ordering::SeqCst);
    }

    /// Stop holding and let one waiting enumeration finish
    pub fn release_enumeration(&self) {
        self.holding.store(false, Ordering::SeqCst);
        self.gate.notify_one();
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn enumerations(&self) -> usize {
        self.enumerations.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BookmarkRepository for FlakyRepository {
    async fn find_by_name_or_alias(
        &self,
        command: &str,
    ) -> Result<Option<Bookmark>, RepositoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.find_by_name_or_alias(command).await
    }

    async fn increment_usage(&self, bookmark: &Bookmark) -> Result<(), RepositoryError> {
        self.check()?;
        if self.failing_increments.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("read-only replica".to_string()));
        }
        self.inner.increment_usage(bookmark).await
    }

    async fn enumerate_all(&self) -> Result<Vec<Bookmark>, RepositoryError> {
        self.enumerations.fetch_add(1, Ordering::SeqCst);
        if self.holding.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        self.check()?;
        self.inner.enumerate_all().await
    }
}
