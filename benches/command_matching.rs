#![warn(clippy::all, clippy::pedantic)]

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use froglol::{
    BookmarkRepository, CommandIndex, FuzzyMatcher, MemoryRepository, NewBookmark, Resolver,
    seed, suggestion::{MatchOptions, rank},
};
use std::sync::Arc;
use tokio::runtime::Runtime;

fn setup_repository() -> Arc<MemoryRepository> {
    let repository = MemoryRepository::new();
    seed::seed(&repository).unwrap();

    // Pad the namespace with a realistic number of team bookmarks
    let teams = [
        "infra", "payments", "search", "mobile", "growth", "billing", "identity", "platform",
    ];
    for team in teams {
        for tool in ["wiki", "jira", "dash", "logs", "oncall", "runbook"] {
            let name = format!("{team}{tool}");
            repository
                .insert(
                    NewBookmark::new(&name, &format!("https://{team}.example/{tool}?q=%s"))
                        .alias(&format!("{}{}", &team[..2], &tool[..2])),
                )
                .unwrap();
        }
    }

    Arc::new(repository)
}

fn bench_command_matching(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let repository = setup_repository();
    let index = runtime
        .block_on(repository.enumerate_all())
        .map(CommandIndex::build)
        .unwrap();
    let options = MatchOptions::default();

    let mut group = c.benchmark_group("command_matching");

    group.bench_function("rank_typo", |b| {
        b.iter(|| rank(&index, black_box("githb"), &options));
    });

    group.bench_function("rank_no_match", |b| {
        b.iter(|| rank(&index, black_box("xyzabc"), &options));
    });

    group.bench_function("rank_long_command", |b| {
        b.iter(|| rank(&index, black_box("paymentsrunbok"), &options));
    });

    let resolver = runtime.block_on(async {
        let matcher = Arc::new(FuzzyMatcher::new(repository.clone()));
        Resolver::new(repository.clone(), matcher, froglol::DEFAULT_FALLBACK_URL)
    });

    group.bench_function("resolve_exact", |b| {
        b.to_async(&runtime)
            .iter(|| resolver.resolve(black_box("gh tokio runtime")));
    });

    group.bench_function("resolve_typo", |b| {
        b.to_async(&runtime)
            .iter(|| resolver.resolve(black_box("githb tokio runtime")));
    });

    group.finish();
}

criterion_group!(benches, bench_command_matching);
criterion_main!(benches);
