#![warn(clippy::all, clippy::pedantic)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::{Scorer, Settings, config::parse_ttl};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Bookmark store to use (defaults to $FROGLOL_STORE_PATH or the data directory)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Minimum similarity score (0-100) for suggestions
    #[arg(long, global = true)]
    pub threshold: Option<u8>,

    /// Maximum number of suggestions
    #[arg(long, global = true)]
    pub limit: Option<usize>,

    /// How long the command index is reused, e.g. `60` or `2m`
    #[arg(long, global = true, value_parser = parse_ttl_arg)]
    pub cache_ttl: Option<std::time::Duration>,

    /// Similarity measure used for suggestions
    #[arg(long, global = true, value_enum)]
    pub scorer: Option<Scorer>,

    /// Search URL template used when nothing matches
    #[arg(long, global = true)]
    pub fallback_url: Option<String>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log lookups and index rebuilds
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a query to a redirect URL or suggestions
    Resolve {
        /// The query, e.g. `g rust borrow checker`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },
    /// Show bookmarks similar to a command
    Suggest {
        command: String,
    },
    /// List all bookmarks
    List,
    /// Replace the store's bookmarks with the defaults
    Seed,
}

impl Cli {
    /// Apply command line overrides on top of `settings`
    #[must_use]
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(store) = &self.store {
            settings.store_path.clone_from(store);
        }
        if let Some(threshold) = self.threshold {
            settings.fuzzy_threshold = threshold;
        }
        if let Some(limit) = self.limit {
            settings.fuzzy_limit = limit;
        }
        if let Some(ttl) = self.cache_ttl {
            settings.fuzzy_cache_ttl = ttl;
        }
        if let Some(scorer) = self.scorer {
            settings.scorer = scorer;
        }
        if let Some(url) = &self.fallback_url {
            settings.fallback_url.clone_from(url);
        }
        settings
    }
}

fn parse_ttl_arg(value: &str) -> Result<std::time::Duration, String> {
    parse_ttl(value).map_err(|e| format!("{e:#}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_resolve_collects_the_whole_query() {
        let cli = Cli::parse_from(["froglol", "--json", "resolve", "g", "rust", "-x"]);
        assert!(cli.json);
        match cli.command {
            Commands::Resolve { query } => assert_eq!(query, ["g", "rust", "-x"]),
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::parse_from([
            "froglol",
            "--threshold",
            "80",
            "--cache-ttl",
            "5m",
            "--scorer",
            "levenshtein",
            "suggest",
            "googl",
            "--limit",
            "1",
        ]);
        let settings = cli.apply(Settings::default());

        assert_eq!(settings.fuzzy_threshold, 80);
        assert_eq!(settings.fuzzy_limit, 1);
        assert_eq!(settings.fuzzy_cache_ttl, Duration::from_secs(300));
        assert_eq!(settings.scorer, Scorer::Levenshtein);
        assert_eq!(settings.fallback_url, Settings::default().fallback_url);
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        assert!(Cli::try_parse_from(["froglol", "--threshold", "300", "list"]).is_err());
    }
}
