#![warn(clippy::all, clippy::pedantic)]

use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
    time::Duration,
};

use crate::{
    Bookmark, BookmarkRepository, DEFAULT_CACHE_TTL_SECS, DEFAULT_FUZZY_LIMIT,
    DEFAULT_FUZZY_THRESHOLD, RepositoryError, Scorer, Settings,
    cache::{CommandCache, CommandIndex},
    template::substitute_args,
};

/// A bookmark offered in place of a mistyped command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    /// The name or alias that matched
    pub command: String,
    pub bookmark: Bookmark,
    /// Similarity between the typed command and `command`, 0-100
    pub score: f64,
}

impl Suggestion {
    /// Target URL if the user picks this suggestion with `args`
    #[must_use]
    pub fn follow_up_url(&self, args: &str) -> String {
        substitute_args(&self.bookmark.url, args)
    }
}

/// Ranking knobs shared by [`FuzzyMatcher`] and [`rank`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Lowest score (inclusive) a command needs to be suggested
    pub threshold: u8,
    /// Maximum number of suggestions
    pub limit: usize,
    pub scorer: Scorer,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_FUZZY_THRESHOLD,
            limit: DEFAULT_FUZZY_LIMIT,
            scorer: Scorer::default(),
        }
    }
}

/// Rank the commands of `index` against `command`.
///
/// Every command scoring at least the threshold is a candidate. Candidates
/// pointing at the same bookmark collapse into the best-scoring one. The
/// rest are ordered by score, then use count (both descending), then by
/// command, and cut to the limit.
#[must_use]
pub fn rank(index: &CommandIndex, command: &str, options: &MatchOptions) -> Vec<Suggestion> {
    let threshold = f64::from(options.threshold);

    let scored: Vec<(&str, &Arc<Bookmark>, f64)> = index
        .entries()
        .par_iter()
        .map(|(key, bookmark)| (key.as_str(), bookmark, options.scorer.ratio(command, key)))
        .filter(|(_, _, score)| *score >= threshold)
        .collect();

    let mut best: HashMap<u64, (&str, &Arc<Bookmark>, f64)> = HashMap::new();
    for candidate in scored {
        let (key, bookmark, score) = candidate;
        match best.entry(bookmark.id) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => {
                let (kept_key, _, kept_score) = *slot.get();
                if score > kept_score || (score == kept_score && key < kept_key) {
                    slot.insert(candidate);
                }
            }
        }
    }

    let mut ranked: Vec<(&str, &Arc<Bookmark>, f64)> = best.into_values().collect();
    ranked.sort_by(|(a_key, a_bookmark, a_score), (b_key, b_bookmark, b_score)| {
        b_score
            .total_cmp(a_score)
            .then_with(|| b_bookmark.use_count.cmp(&a_bookmark.use_count))
            .then_with(|| a_key.cmp(b_key))
    });
    ranked.truncate(options.limit);

    ranked
        .into_iter()
        .map(|(key, bookmark, score)| Suggestion {
            command: key.to_string(),
            bookmark: Bookmark::clone(bookmark),
            score,
        })
        .collect()
}

/// Suggests bookmarks for commands that have no exact match
///
/// Keeps a cached [`CommandIndex`] of every name and alias, rebuilt from the
/// repository once it is older than the cache TTL. Construct one per process
/// and share it.
pub struct FuzzyMatcher {
    repository: Arc<dyn BookmarkRepository>,
    cache: CommandCache,
    options: MatchOptions,
}

impl std::fmt::Debug for FuzzyMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzyMatcher")
            .field("repository", &"Arc<dyn BookmarkRepository>")
            .field("cache", &self.cache)
            .field("options", &self.options)
            .finish()
    }
}

impl FuzzyMatcher {
    /// Create a matcher with the default threshold, limit and TTL
    #[must_use]
    pub fn new(repository: Arc<dyn BookmarkRepository>) -> Self {
        Self {
            repository,
            cache: CommandCache::new(Duration::from_secs(DEFAULT_CACHE_TTL_SECS)),
            options: MatchOptions::default(),
        }
    }

    #[must_use]
    pub fn from_settings(repository: Arc<dyn BookmarkRepository>, settings: &Settings) -> Self {
        Self::new(repository)
            .with_threshold(settings.fuzzy_threshold)
            .with_limit(settings.fuzzy_limit)
            .with_cache_ttl(settings.fuzzy_cache_ttl)
            .with_scorer(settings.scorer)
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.options.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.options.limit = limit;
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = CommandCache::new(ttl);
        self
    }

    #[must_use]
    pub fn with_scorer(mut self, scorer: Scorer) -> Self {
        self.options.scorer = scorer;
        self
    }

    #[must_use]
    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    #[must_use]
    pub fn cache(&self) -> &CommandCache {
        &self.cache
    }

    /// Ranked suggestions for `command`, empty when nothing is close enough.
    ///
    /// Never fails: if the index cannot be rebuilt the last good one is used,
    /// and without any index there are simply no suggestions. After a failed
    /// rebuild the last good index is served for a short backoff before the
    /// repository is asked again.
    pub async fn suggest(&self, command: &str) -> Vec<Suggestion> {
        match self.index().await {
            Some(index) => rank(&index, command, &self.options),
            None => Vec::new(),
        }
    }

    /// Rebuild the command index now, regardless of its age.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot enumerate its bookmarks; the
    /// previous index is kept in that case.
    pub async fn refresh(&self) -> Result<Arc<CommandIndex>, RepositoryError> {
        let bookmarks = self.repository.enumerate_all().await?;
        let index = CommandIndex::build(bookmarks);
        debug!("Rebuilt command index with {} commands", index.len());
        Ok(self.cache.store(index))
    }

    /// Force the next suggestion to rebuild the index
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    async fn index(&self) -> Option<Arc<CommandIndex>> {
        if let Some(index) = self.cache.fresh() {
            return Some(index);
        }

        let stale = self.cache.last_good();
        if stale.is_some() && self.cache.backing_off() {
            debug!("Command index rebuild failed recently, serving the previous index");
            return stale;
        }

        let guard = self.cache.try_begin_rebuild();
        if guard.is_none() && stale.is_some() {
            debug!("Command index rebuild in progress, serving the previous index");
            return stale;
        }

        match self.refresh().await {
            Ok(index) => Some(index),
            Err(e) => {
                warn!("Failed to rebuild command index: {e}");
                self.cache.record_failure();
                stale
            }
        }
    }
}
