#![warn(clippy::all, clippy::pedantic)]

use log::debug;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    BookmarkRepository, FuzzyMatcher, ResolveError, Settings, Suggestion, UsageTracker,
    query::parse_query, template::substitute_args,
};

/// Where a redirect leads
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectTarget {
    /// The bookmark with this canonical name matched exactly
    Bookmark(String),
    /// Nothing matched, the query goes to the fallback search
    Fallback,
}

/// Outcome of resolving one query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RedirectResult {
    Redirect {
        url: String,
        target: RedirectTarget,
    },
    /// The command did not match exactly but resembles known ones.
    ///
    /// `args` is kept so the caller can build the follow-up URL of whichever
    /// suggestion the user picks.
    Suggestions {
        command: String,
        args: String,
        suggestions: Vec<Suggestion>,
    },
}

impl RedirectResult {
    /// The redirect URL, if this is a redirect
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Redirect { url, .. } => Some(url),
            Self::Suggestions { .. } => None,
        }
    }

    /// The suggestions, empty for a redirect
    #[must_use]
    pub fn suggestions(&self) -> &[Suggestion] {
        match self {
            Self::Redirect { .. } => &[],
            Self::Suggestions { suggestions, .. } => suggestions,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            Self::Redirect {
                target: RedirectTarget::Fallback,
                ..
            }
        )
    }
}

/// Turns raw queries into redirects or suggestions
///
/// Lookup order: exact name or alias, then fuzzy suggestions, then the
/// fallback search. Shareable across tasks; holds no per-request state.
pub struct Resolver {
    repository: Arc<dyn BookmarkRepository>,
    matcher: Arc<FuzzyMatcher>,
    usage: UsageTracker,
    fallback_url: String,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("repository", &"Arc<dyn BookmarkRepository>")
            .field("matcher", &self.matcher)
            .field("usage", &self.usage)
            .field("fallback_url", &self.fallback_url)
            .finish()
    }
}

impl Resolver {
    /// Create a resolver and start its usage tracker.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn new(
        repository: Arc<dyn BookmarkRepository>,
        matcher: Arc<FuzzyMatcher>,
        fallback_url: &str,
    ) -> Self {
        Self {
            usage: UsageTracker::spawn(Arc::clone(&repository)),
            repository,
            matcher,
            fallback_url: fallback_url.to_string(),
        }
    }

    /// Create a resolver with its own fuzzy matcher configured from `settings`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn from_settings(repository: Arc<dyn BookmarkRepository>, settings: &Settings) -> Self {
        let matcher = Arc::new(FuzzyMatcher::from_settings(
            Arc::clone(&repository),
            settings,
        ));
        Self::new(repository, matcher, &settings.fallback_url)
    }

    #[must_use]
    pub fn matcher(&self) -> &Arc<FuzzyMatcher> {
        &self.matcher
    }

    /// Resolve a raw query.
    ///
    /// An exact match redirects to the bookmark and counts a use. Otherwise
    /// similar commands are suggested, and when there are none the whole
    /// query is handed to the fallback search. Leading and trailing
    /// whitespace is dropped from that query first, so `"  xyzzy  "`
    /// searches for `xyzzy` rather than `++xyzzy++`; inner whitespace is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::LookupUnavailable`] if the exact lookup cannot
    /// reach the repository. Unmatched commands are never an error.
    pub async fn resolve(&self, raw_query: &str) -> Result<RedirectResult, ResolveError> {
        let (command, args) = parse_query(raw_query);
        if command.is_empty() {
            debug!("Empty query, using fallback");
            return Ok(self.fallback(""));
        }

        let found = self
            .repository
            .find_by_name_or_alias(&command)
            .await
            .map_err(ResolveError::LookupUnavailable)?;

        if let Some(bookmark) = found {
            let url = substitute_args(&bookmark.url, &args);
            debug!("'{command}' resolved to '{}'", bookmark.name);
            let target = RedirectTarget::Bookmark(bookmark.name.clone());
            self.usage.record(bookmark);
            return Ok(RedirectResult::Redirect { url, target });
        }

        let suggestions = self.matcher.suggest(&command).await;
        if !suggestions.is_empty() {
            debug!("'{command}' has {} suggestions", suggestions.len());
            return Ok(RedirectResult::Suggestions {
                command,
                args,
                suggestions,
            });
        }

        debug!("'{command}' matched nothing, using fallback");
        Ok(self.fallback(raw_query.trim()))
    }

    /// Stop the usage tracker after its queued increments are applied
    pub async fn shutdown(self) -> usize {
        self.usage.shutdown().await
    }

    fn fallback(&self, query: &str) -> RedirectResult {
        RedirectResult::Redirect {
            url: substitute_args(&self.fallback_url, query),
            target: RedirectTarget::Fallback,
        }
    }
}
