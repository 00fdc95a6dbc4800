#![warn(clippy::all, clippy::pedantic)]

use anyhow::{Context, Result};
use colored::Colorize;
use std::{fmt::Write as _, sync::Arc};

use crate::{
    Bookmark, BookmarkRepository, FuzzyMatcher, JsonFileRepository, RedirectResult,
    RedirectTarget, Resolver, Settings, Suggestion, normalize_command,
};

fn open_store(settings: &Settings) -> Result<Arc<JsonFileRepository>> {
    let repository = JsonFileRepository::load_from_path(&settings.store_path)?;
    Ok(Arc::new(repository))
}

/// Resolve a query and print where it leads
pub async fn resolve(settings: &Settings, query: &str, json: bool) -> Result<()> {
    let repository = open_store(settings)?;
    let resolver = Resolver::from_settings(repository, settings);

    let result = resolver
        .resolve(query)
        .await
        .with_context(|| format!("Could not resolve '{query}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_result(&result));
    }

    resolver.shutdown().await;
    Ok(())
}

/// Print bookmarks similar to `command`
pub async fn suggest(settings: &Settings, command: &str, json: bool) -> Result<()> {
    let repository = open_store(settings)?;
    let command = normalize_command(command);
    let suggestions = find_suggestions(repository, settings, &command).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
    } else if suggestions.is_empty() {
        println!("No bookmarks look like '{command}' 🐸");
    } else {
        print!("{}", render_suggestions(&suggestions, ""));
    }
    Ok(())
}

/// Rank bookmarks similar to `command` with a matcher built from `settings`.
///
/// Nothing is resolved here, so no usage is recorded.
pub async fn find_suggestions(
    repository: Arc<dyn BookmarkRepository>,
    settings: &Settings,
    command: &str,
) -> Vec<Suggestion> {
    FuzzyMatcher::from_settings(repository, settings)
        .suggest(&normalize_command(command))
        .await
}

/// Print every bookmark
pub fn list(settings: &Settings, json: bool) -> Result<()> {
    let repository = open_store(settings)?;
    let bookmarks = repository.bookmarks();

    if json {
        println!("{}", serde_json::to_string_pretty(&bookmarks)?);
    } else if bookmarks.is_empty() {
        println!("No bookmarks yet 🐸");
    } else {
        print!("{}", render_bookmarks(&bookmarks));
    }
    Ok(())
}

/// Replace the store's bookmarks with the defaults
pub async fn seed(settings: &Settings) -> Result<()> {
    let repository = open_store(settings)?;
    let count = repository
        .reset_to_seed()
        .await
        .with_context(|| format!("Failed to seed {}", settings.store_path.display()))?;
    println!(
        "Seeded {count} bookmarks into {} 🐸",
        settings.store_path.display()
    );
    Ok(())
}

#[must_use]
pub fn render_result(result: &RedirectResult) -> String {
    match result {
        RedirectResult::Redirect {
            url,
            target: RedirectTarget::Bookmark(name),
        } => format!("{} {}\n", format!("[{name}]").bright_green(), url),
        RedirectResult::Redirect {
            url,
            target: RedirectTarget::Fallback,
        } => format!("{} {}\n", "[search]".bright_yellow(), url),
        RedirectResult::Suggestions {
            command,
            args,
            suggestions,
        } => format!(
            "Ribbit? 🐸 No bookmark named '{}'. Did you mean:\n{}",
            command,
            render_suggestions(suggestions, args)
        ),
    }
}

#[must_use]
pub fn render_suggestions(suggestions: &[Suggestion], args: &str) -> String {
    let mut out = String::new();
    for (i, suggestion) in suggestions.iter().enumerate() {
        let description = suggestion.bookmark.description.as_deref().unwrap_or("");
        let _ = writeln!(
            out,
            "{}. {} ({:.0}%) {} {}",
            i + 1,
            suggestion.command.bright_green(),
            suggestion.score,
            description,
            suggestion.follow_up_url(args).bright_blue()
        );
    }
    out
}

#[must_use]
pub fn render_bookmarks(bookmarks: &[Bookmark]) -> String {
    let mut out = String::new();
    for bookmark in bookmarks {
        let aliases = if bookmark.aliases.is_empty() {
            String::new()
        } else {
            format!(" ({})", bookmark.aliases.join(", "))
        };
        let _ = writeln!(
            out,
            "{}{} → {} [used {} times]",
            bookmark.name.bright_green(),
            aliases,
            bookmark.url.bright_blue(),
            bookmark.use_count
        );
    }
    out
}
