#![warn(clippy::all, clippy::pedantic)]

//! Command-to-URL redirection.
//!
//! A query such as `g rust borrow checker` is split into a command (`g`) and
//! its arguments, the command is looked up by name or alias, and the
//! arguments are substituted into the bookmark's URL template. Mistyped
//! commands get ranked fuzzy suggestions before falling back to a default
//! search URL.

pub mod bookmark;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod history;
pub mod query;
pub mod redirect;
pub mod repository;
pub mod seed;
pub mod suggestion;
pub mod template;
pub mod utils;

#[cfg(test)]
mod tests;

pub use bookmark::{Bookmark, NewBookmark, normalize_command};
pub use cache::{CommandCache, CommandIndex};
pub use config::Settings;
pub use error::{RepositoryError, ResolveError};
pub use history::UsageTracker;
pub use query::parse_query;
pub use redirect::{RedirectResult, RedirectTarget, Resolver};
pub use repository::{BookmarkRepository, JsonFileRepository, MemoryRepository};
pub use suggestion::{FuzzyMatcher, Suggestion};
pub use template::substitute_args;
pub use utils::Scorer;

/// Default file name for the bookmark store
pub const STORE_FILE: &str = "froglol_bookmarks.json";

/// Placeholder replaced by the encoded arguments in URL templates
pub const PLACEHOLDER: &str = "%s";

/// Minimum similarity score (0-100) for a fuzzy suggestion
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 60;

/// Maximum number of fuzzy suggestions
pub const DEFAULT_FUZZY_LIMIT: usize = 3;

/// Lifetime of the command index in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Search URL used when nothing matches
pub const DEFAULT_FALLBACK_URL: &str = "https://www.google.com/search?q=%s";
