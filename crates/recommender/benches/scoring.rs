//! Benchmarks for the recommendation hot path
//!
//! Run with: cargo bench --package recommender
//!
//! Builds a synthetic community (tags, users, follows, contents) and
//! measures collaborative tag scoring, hybrid blending, and the pure
//! similarity kernel.

use affinity_store::{MemoryStore, Tag, TagId};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use recommender::{RecommendationEngine, jaccard};
use std::collections::HashSet;
use std::sync::Arc;

const TAGS: u64 = 200;
const USERS: u64 = 500;
const TAGS_PER_USER: u64 = 12;
const CONTENTS_PER_TAG: u64 = 8;

fn build_bench_store() -> Arc<MemoryStore> {
    let mut store = MemoryStore::new();

    for id in 1..=TAGS {
        let weight = (id % 100) as u8;
        store
            .insert_tag(Tag::new(id, format!("tag-{id}"), weight, id * 13 % 2000, 0))
            .expect("valid tag weight");
    }

    // Deterministic pseudo-random follows so user pools overlap
    for user in 1..=USERS {
        for k in 0..TAGS_PER_USER {
            let tag = (user * 7 + k * 31) % TAGS + 1;
            store.follow(user, tag);
        }
    }

    let mut content_id = 1u64;
    for tag in 1..=TAGS {
        for _ in 0..CONTENTS_PER_TAG {
            store.tag_content(content_id, tag);
            store.tag_content(content_id, (tag % TAGS) + 1);
            content_id += 1;
        }
    }

    Arc::new(store)
}

fn bench_recommend_tags(c: &mut Criterion) {
    let store = build_bench_store();
    let engine = RecommendationEngine::new(store.clone(), store.clone(), store, 42);

    c.bench_function("recommend_tags", |b| {
        b.iter(|| {
            let recs = engine
                .recommend_tags(black_box(1), black_box(20))
                .expect("valid arguments");
            black_box(recs)
        })
    });
}

fn bench_recommend_contents(c: &mut Criterion) {
    let store = build_bench_store();
    let engine = RecommendationEngine::new(store.clone(), store.clone(), store, 42);

    c.bench_function("recommend_contents", |b| {
        b.iter(|| {
            let recs = engine
                .recommend_contents(black_box(1), black_box(&[]), black_box(20))
                .expect("valid arguments");
            black_box(recs)
        })
    });
}

fn bench_jaccard(c: &mut Criterion) {
    let a: HashSet<TagId> = (0..50).collect();
    let b: HashSet<TagId> = (25..75).collect();

    c.bench_function("jaccard_50x50", |bench| {
        bench.iter(|| black_box(jaccard(black_box(&a), black_box(&b))))
    });
}

criterion_group!(
    benches,
    bench_recommend_tags,
    bench_recommend_contents,
    bench_jaccard
);
criterion_main!(benches);
