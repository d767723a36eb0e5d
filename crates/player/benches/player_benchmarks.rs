//! Player benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dom::Document;
use player::uid::generate_uid;
use player::{DefaultCollaborators, PlayerConfig, PlayerRegistry};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;

fn page(players: usize) -> Document {
    let mut doc = Document::blank();
    for i in 0..players {
        let attrs = if i % 2 == 0 {
            format!(r#"class="om-player" src="clip-{i}.mp4""#)
        } else {
            format!(
                r#"class="om-player" src="clip-{i}.mp4" data-om-ads="http://ads.example/{i}.xml""#
            )
        };
        let video = doc.create_element_with("video", &attrs);
        doc.append_to_body(video);
    }
    doc
}

/// Benchmark page-level bulk initialization.
fn bench_bulk_init(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_init");
    let config = Arc::new(PlayerConfig::default());

    for players in [1usize, 10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(players), &players, |b, &players| {
            b.iter_batched(
                || page(players),
                |mut doc| {
                    let registry = PlayerRegistry::bulk_init(
                        &mut doc,
                        config.clone(),
                        Arc::new(DefaultCollaborators),
                    );
                    black_box(registry.len())
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

/// Benchmark uid generation against a growing key set.
fn bench_uid_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("uid_generation");

    for taken in [0usize, 1_000, 10_000] {
        let mut rng = StdRng::seed_from_u64(1);
        let keys: HashSet<String> = (0..taken)
            .map(|_| generate_uid(&mut rng, "om-", 8, |_| false))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(taken), &keys, |b, keys| {
            b.iter(|| black_box(generate_uid(&mut rng, "om-", 8, |c| keys.contains(c))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_bulk_init, bench_uid_generation);
criterion_main!(benches);
