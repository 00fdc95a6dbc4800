#![warn(clippy::all, clippy::pedantic)]

use crate::{NewBookmark, RepositoryError, repository::MemoryRepository};

/// Default bookmark: name, URL template, description, aliases
pub struct SeedBookmark {
    pub name: &'static str,
    pub url: &'static str,
    pub description: &'static str,
    pub aliases: &'static [&'static str],
}

impl SeedBookmark {
    #[must_use]
    pub fn to_new_bookmark(&self) -> NewBookmark {
        NewBookmark {
            name: self.name.to_string(),
            url: self.url.to_string(),
            description: Some(self.description.to_string()),
            aliases: self.aliases.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Bookmarks installed into a fresh store
pub const SEED_BOOKMARKS: &[SeedBookmark] = &[
    SeedBookmark {
        name: "froglol",
        url: "http://localhost:5000/manage",
        description: "Froglol bookmark management",
        aliases: &["manage", "list"],
    },
    SeedBookmark {
        name: "google",
        url: "https://www.google.com/search?q=%s",
        description: "Google search",
        aliases: &["g"],
    },
    SeedBookmark {
        name: "github",
        url: "https://github.com/search?q=%s",
        description: "GitHub search",
        aliases: &["gh"],
    },
    SeedBookmark {
        name: "youtube",
        url: "https://www.youtube.com/results?search_query=%s",
        description: "YouTube search",
        aliases: &["yt"],
    },
    SeedBookmark {
        name: "wikipedia",
        url: "https://en.wikipedia.org/wiki/Special:Search?search=%s",
        description: "Wikipedia search",
        aliases: &["wiki", "w"],
    },
    SeedBookmark {
        name: "stackoverflow",
        url: "https://stackoverflow.com/search?q=%s",
        description: "Stack Overflow search",
        aliases: &["so", "stack"],
    },
    SeedBookmark {
        name: "reddit",
        url: "https://www.reddit.com/search?q=%s",
        description: "Reddit search",
        aliases: &["r"],
    },
    SeedBookmark {
        name: "twitter",
        url: "https://twitter.com/search?q=%s",
        description: "Twitter search",
        aliases: &["tw"],
    },
    SeedBookmark {
        name: "amazon",
        url: "https://www.amazon.com/s?k=%s",
        description: "Amazon product search",
        aliases: &["amz"],
    },
    SeedBookmark {
        name: "chatgpt",
        url: "https://chat.openai.com/",
        description: "ChatGPT by OpenAI",
        aliases: &["gpt", "openai"],
    },
    SeedBookmark {
        name: "claude",
        url: "https://claude.ai/",
        description: "Claude by Anthropic",
        aliases: &["anthropic"],
    },
    SeedBookmark {
        name: "gemini",
        url: "https://gemini.google.com/",
        description: "Gemini by Google",
        aliases: &["bard"],
    },
];

/// Insert the default bookmarks, returning how many were stored.
///
/// # Errors
///
/// Returns an error if a default bookmark collides with an existing one.
pub fn seed(repository: &MemoryRepository) -> Result<usize, RepositoryError> {
    for bookmark in SEED_BOOKMARKS {
        repository.insert(bookmark.to_new_bookmark())?;
    }
    Ok(SEED_BOOKMARKS.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_bookmarks_form_a_valid_namespace() -> anyhow::Result<()> {
        let repository = MemoryRepository::new();
        assert_eq!(seed(&repository)?, SEED_BOOKMARKS.len());
        assert_eq!(repository.len(), SEED_BOOKMARKS.len());
        Ok(())
    }

    #[test]
    fn test_seeding_twice_conflicts() -> anyhow::Result<()> {
        let repository = MemoryRepository::new();
        seed(&repository)?;
        assert!(matches!(seed(&repository), Err(RepositoryError::Conflict(_))));
        Ok(())
    }
}
