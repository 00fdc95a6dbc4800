use anyhow::{Result, anyhow};
use std::{sync::Arc, time::Duration};

use super::{FlakyRepository, bookmark, multiple_bookmarks};
use crate::{FuzzyMatcher, RedirectResult, Resolver, Settings};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_resolutions_count_every_use() -> Result<()> {
    let repository = multiple_bookmarks();
    let settings = Settings {
        fuzzy_cache_ttl: Duration::ZERO,
        ..Settings::default()
    };
    let resolver = Arc::new(Resolver::from_settings(repository.clone(), &settings));

    let tasks = (0..64).map(|i| {
        let resolver = Arc::clone(&resolver);
        tokio::spawn(async move {
            let query = if i % 2 == 0 { "gh tokio" } else { "githb tokio" };
            resolver.resolve(query).await
        })
    });

    for joined in futures::future::join_all(tasks).await {
        match joined?? {
            RedirectResult::Redirect { url, .. } => {
                assert_eq!(url, "https://github.example/?q=tokio");
            }
            RedirectResult::Suggestions { suggestions, .. } => {
                assert_eq!(suggestions[0].bookmark.name, "github");
            }
        }
    }

    let resolver =
        Arc::try_unwrap(resolver).map_err(|_| anyhow!("resolver still shared after tasks"))?;
    assert_eq!(resolver.shutdown().await, 32);
    assert_eq!(repository.get(2).map(|b| b.use_count), Some(82));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_misses_share_a_fresh_index() -> Result<()> {
    let repository = Arc::new(FlakyRepository::new());
    repository.insert(bookmark(1, "google", 0, &["g"]))?;
    let matcher = Arc::new(FuzzyMatcher::new(repository.clone()));

    // Warm the index, then hammer it while it is fresh
    matcher.refresh().await?;
    let tasks = (0..32).map(|_| {
        let matcher = Arc::clone(&matcher);
        tokio::spawn(async move { matcher.suggest("googel").await })
    });
    for joined in futures::future::join_all(tasks).await {
        assert_eq!(joined?[0].command, "google");
    }

    assert_eq!(repository.enumerations(), 1);
    Ok(())
}
