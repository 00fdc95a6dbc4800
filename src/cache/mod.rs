#![warn(clippy::all, clippy::pedantic)]

use log::debug;
use std::{
    collections::BTreeMap,
    collections::btree_map::Entry,
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use crate::Bookmark;

/// Point-in-time mapping from every known command to its bookmark
///
/// Canonical names and aliases share one key space. Several keys may point
/// at the same bookmark, but each key points at exactly one.
#[derive(Debug, Default)]
pub struct CommandIndex {
    entries: BTreeMap<String, Arc<Bookmark>>,
}

impl CommandIndex {
    /// Flatten bookmarks into a command index.
    ///
    /// Canonical names are indexed before any alias, so a name always wins a
    /// collision with another bookmark's alias. Among aliases the first one
    /// seen is kept.
    #[must_use]
    pub fn build(bookmarks: Vec<Bookmark>) -> Self {
        let bookmarks: Vec<Arc<Bookmark>> = bookmarks.into_iter().map(Arc::new).collect();
        let mut entries = BTreeMap::new();

        for bookmark in &bookmarks {
            insert_command(&mut entries, &bookmark.name, bookmark);
        }
        for bookmark in &bookmarks {
            for alias in &bookmark.aliases {
                insert_command(&mut entries, alias, bookmark);
            }
        }

        Self { entries }
    }

    #[must_use]
    pub fn get(&self, command: &str) -> Option<&Arc<Bookmark>> {
        self.entries.get(command)
    }

    /// Commands in ascending order with their bookmarks
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Bookmark>)> {
        self.entries
            .iter()
            .map(|(command, bookmark)| (command.as_str(), bookmark))
    }

    pub(crate) fn entries(&self) -> &BTreeMap<String, Arc<Bookmark>> {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn insert_command(
    entries: &mut BTreeMap<String, Arc<Bookmark>>,
    command: &str,
    bookmark: &Arc<Bookmark>,
) {
    match entries.entry(command.to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(Arc::clone(bookmark));
        }
        Entry::Occupied(existing) if existing.get().id != bookmark.id => {
            debug!(
                "Command '{command}' of '{}' shadowed by '{}'",
                bookmark.name,
                existing.get().name
            );
        }
        Entry::Occupied(_) => {}
    }
}

/// Longest wait before retrying a failed rebuild; shorter TTLs cap it
const REBUILD_RETRY_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Debug)]
struct Snapshot {
    index: Arc<CommandIndex>,
    built_at: Instant,
    invalidated: bool,
    failed_at: Option<Instant>,
}

/// Holds the most recent command index and decides when it is stale
///
/// Readers clone an `Arc` to a complete index; a rebuild swaps in a new
/// index as a whole, so nobody ever observes a half-built one.
#[derive(Debug)]
pub struct CommandCache {
    snapshot: RwLock<Option<Snapshot>>,
    rebuilding: AtomicBool,
    ttl: Duration,
}

impl CommandCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            snapshot: RwLock::new(None),
            rebuilding: AtomicBool::new(false),
            ttl,
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached index if it is younger than the TTL
    #[must_use]
    pub fn fresh(&self) -> Option<Arc<CommandIndex>> {
        let snapshot = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        snapshot
            .as_ref()
            .filter(|snapshot| !snapshot.invalidated && snapshot.built_at.elapsed() <= self.ttl)
            .map(|snapshot| Arc::clone(&snapshot.index))
    }

    /// The cached index whatever its age
    #[must_use]
    pub fn last_good(&self) -> Option<Arc<CommandIndex>> {
        let snapshot = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        snapshot.as_ref().map(|snapshot| Arc::clone(&snapshot.index))
    }

    /// Replace the cached index and restart its TTL
    pub fn store(&self, index: CommandIndex) -> Arc<CommandIndex> {
        let index = Arc::new(index);
        let mut snapshot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *snapshot = Some(Snapshot {
            index: Arc::clone(&index),
            built_at: Instant::now(),
            invalidated: false,
            failed_at: None,
        });
        index
    }

    /// Mark the cached index stale so the next lookup rebuilds it.
    ///
    /// The old index stays available through [`Self::last_good`].
    pub fn invalidate(&self) {
        let mut snapshot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(snapshot) = snapshot.as_mut() {
            snapshot.invalidated = true;
            snapshot.failed_at = None;
        }
    }

    /// Note that a rebuild failed, holding off the next attempt for a while.
    ///
    /// Without a cached index there is nothing to serve meanwhile, so no
    /// backoff applies.
    pub fn record_failure(&self) {
        let mut snapshot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(snapshot) = snapshot.as_mut() {
            snapshot.failed_at = Some(Instant::now());
        }
    }

    /// Whether a recent failed rebuild means the stale index should be served
    #[must_use]
    pub fn backing_off(&self) -> bool {
        let backoff = self.ttl.min(REBUILD_RETRY_BACKOFF);
        let snapshot = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.failed_at)
            .is_some_and(|failed_at| failed_at.elapsed() < backoff)
    }

    /// Claim the right to rebuild, unless another caller already holds it.
    pub fn try_begin_rebuild(&self) -> Option<RebuildGuard<'_>> {
        self.rebuilding
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RebuildGuard {
                flag: &self.rebuilding,
            })
    }

    #[must_use]
    pub fn is_rebuilding(&self) -> bool {
        self.rebuilding.load(Ordering::Acquire)
    }
}

/// Releases the rebuild claim when dropped, including on cancellation
#[derive(Debug)]
pub struct RebuildGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for RebuildGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bookmark(id: u64, name: &str, aliases: &[&str]) -> Bookmark {
        Bookmark {
            id,
            name: name.to_string(),
            url: format!("https://{name}.example/?q=%s"),
            description: None,
            use_count: 0,
            aliases: aliases.iter().map(ToString::to_string).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_index_flattens_names_and_aliases() {
        let index = CommandIndex::build(vec![
            bookmark(1, "google", &["g"]),
            bookmark(2, "wikipedia", &["wiki", "w"]),
        ]);

        assert_eq!(index.len(), 5);
        assert_eq!(index.get("g").map(|b| b.id), Some(1));
        assert_eq!(index.get("wiki").map(|b| b.id), Some(2));
        assert_eq!(index.get("w").map(|b| b.id), Some(2));

        let commands: Vec<&str> = index.iter().map(|(command, _)| command).collect();
        assert_eq!(commands, ["g", "google", "w", "wiki", "wikipedia"]);
    }

    #[test]
    fn test_canonical_name_wins_alias_collision() {
        let index = CommandIndex::build(vec![
            bookmark(1, "search", &["gh"]),
            bookmark(2, "gh", &[]),
        ]);

        assert_eq!(index.get("gh").map(|b| b.id), Some(2));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_aliases_share_the_bookmark_allocation() {
        let index = CommandIndex::build(vec![bookmark(1, "stackoverflow", &["so", "stack"])]);
        let name = index.get("stackoverflow").map(Arc::clone);
        let alias = index.get("so").map(Arc::clone);

        match (name, alias) {
            (Some(name), Some(alias)) => assert!(Arc::ptr_eq(&name, &alias)),
            other => panic!("missing commands: {other:?}"),
        }
    }

    #[test]
    fn test_empty_cache_has_nothing() {
        let cache = CommandCache::new(Duration::from_secs(60));
        assert!(cache.fresh().is_none());
        assert!(cache.last_good().is_none());
    }

    #[test]
    fn test_stored_index_is_fresh_until_invalidated() {
        let cache = CommandCache::new(Duration::from_secs(60));
        cache.store(CommandIndex::build(vec![bookmark(1, "google", &[])]));
        assert!(cache.fresh().is_some());

        cache.invalidate();
        assert!(cache.fresh().is_none());
        assert_eq!(cache.last_good().map(|index| index.len()), Some(1));

        cache.store(CommandIndex::default());
        assert!(cache.fresh().is_some());
    }

    #[test]
    fn test_index_goes_stale_after_ttl() {
        let cache = CommandCache::new(Duration::from_millis(10));
        cache.store(CommandIndex::default());
        std::thread::sleep(Duration::from_millis(30));

        assert!(cache.fresh().is_none());
        assert!(cache.last_good().is_some());
    }

    #[test]
    fn test_failed_rebuild_backs_off_until_invalidated() {
        let cache = CommandCache::new(Duration::from_secs(60));
        cache.record_failure();
        assert!(!cache.backing_off());

        cache.store(CommandIndex::default());
        cache.record_failure();
        assert!(cache.backing_off());

        cache.invalidate();
        assert!(!cache.backing_off());

        cache.record_failure();
        cache.store(CommandIndex::default());
        assert!(!cache.backing_off());
    }

    #[test]
    fn test_backoff_never_outlasts_the_ttl() {
        let cache = CommandCache::new(Duration::ZERO);
        cache.store(CommandIndex::default());
        cache.record_failure();
        assert!(!cache.backing_off());
    }

    #[test]
    fn test_only_one_rebuild_at_a_time() {
        let cache = CommandCache::new(Duration::from_secs(60));

        let guard = cache.try_begin_rebuild();
        assert!(guard.is_some());
        assert!(cache.is_rebuilding());
        assert!(cache.try_begin_rebuild().is_none());

        drop(guard);
        assert!(!cache.is_rebuilding());
        assert!(cache.try_begin_rebuild().is_some());
    }
}
