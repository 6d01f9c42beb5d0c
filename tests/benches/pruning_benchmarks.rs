//! # State Pruning Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | resolve_policy | < 1us |
//! | compaction pass, 10k versions | < 50ms |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use qc_18_state_pruning::{
    resolve_policy, HistoryPruner, MemoryMultiStore, MultiVersionStore, PruningConfig,
    RetentionPolicy,
};

fn bench_resolve_policy(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-resolve");

    let custom = PruningConfig::custom(100, 0, 10);
    group.bench_function("custom", |b| b.iter(|| black_box(resolve_policy(&custom).is_ok())));

    let preset = PruningConfig::with_strategy("EVERYTHING");
    group.bench_function("preset", |b| b.iter(|| black_box(resolve_policy(&preset).is_ok())));

    group.finish();
}

fn bench_compaction_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-compaction");
    let policy = RetentionPolicy::custom(100, 1_000, 10).unwrap();

    for versions in [1_000u64, 10_000] {
        let mut seeded = MemoryMultiStore::new();
        for height in 0..versions {
            seeded.set("bank", b"supply", &height.to_be_bytes());
            seeded.commit().unwrap();
        }
        seeded.set_pruning_policy(policy);

        group.bench_with_input(BenchmarkId::from_parameter(versions), &seeded, |b, seeded| {
            b.iter_batched(
                || seeded.clone(),
                |mut store| black_box(store.prune_history_versions().unwrap().pruned_count()),
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve_policy, bench_compaction_pass);
criterion_main!(benches);
