#![warn(clippy::all, clippy::pedantic)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalize a command for storage and lookup: trimmed and lowercased.
#[must_use]
pub fn normalize_command(command: &str) -> String {
    command.trim().to_lowercase()
}

/// A named URL template reachable by its name or any of its aliases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Identity assigned by the repository
    pub id: u64,

    /// Canonical command
    pub name: String,

    /// Target URL, may contain `%s` placeholders
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Number of successful redirects through this bookmark
    #[serde(default)]
    pub use_count: u64,

    /// Alternate commands
    #[serde(default)]
    pub aliases: Vec<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    /// All command strings reaching this bookmark, canonical name first.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// A bookmark that has not been stored yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBookmark {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl NewBookmark {
    #[must_use]
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }
}
