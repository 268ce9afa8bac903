//! Cache insert/lookup throughput, atop the Robin Hood hashmap.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dnscore_cache::{Cache, Family, Transport};

fn bench_add_distinct_names(c: &mut Criterion) {
    let sizes: &[usize] = &[100, 1_000, 10_000];
    let mut group = c.benchmark_group("cache_add_distinct_names");

    for &n in sizes {
        let names: Vec<Vec<u8>> = (0..n).map(|i| format!("ns{i}.example").into_bytes()).collect();
        group.bench_with_input(BenchmarkId::new("add", n), &names, |b, names| {
            b.iter(|| {
                let cache: Arc<Cache<'_, u32>> = Cache::new();
                for (i, name) in names.iter().enumerate() {
                    cache.add(name, Transport::Dot, Family::V4, i as u32).unwrap();
                }
                criterion::black_box(cache.len());
            });
        });
    }
    group.finish();
}

fn bench_find_hit(c: &mut Criterion) {
    let n = 10_000;
    let names: Vec<Vec<u8>> = (0..n).map(|i| format!("ns{i}.example").into_bytes()).collect();
    let cache: Arc<Cache<'_, u32>> = Cache::new();
    for (i, name) in names.iter().enumerate() {
        cache.add(name, Transport::Dot, Family::V4, i as u32).unwrap();
    }

    c.bench_function("cache_find_hit_10000", |b| {
        b.iter(|| {
            for name in &names {
                criterion::black_box(cache.find(name, Transport::Dot, Family::V4));
            }
        });
    });
}

criterion_group!(benches, bench_add_distinct_names, bench_find_hit);
criterion_main!(benches);
