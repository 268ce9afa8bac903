//! Insertion and growth benchmarks.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dnscore_hashmap::{HashMap, KeyMode};

fn bench_sequential_insert(c: &mut Criterion) {
    let sizes: &[usize] = &[100, 1_000, 10_000];
    let mut group = c.benchmark_group("sequential_insert");

    for &n in sizes {
        let keys: Vec<Vec<u8>> = (0..n).map(|i| format!("bench-key-{i}").into_bytes()).collect();
        group.bench_with_input(BenchmarkId::new("insert", n), &keys, |b, keys| {
            b.iter(|| {
                let mut map: HashMap<'_, usize> = HashMap::create_seeded(4, KeyMode::Exact, [0u8; 16]);
                for (i, k) in keys.iter().enumerate() {
                    map.add(k, i).unwrap();
                }
                criterion::black_box(map.count());
            });
        });
    }
    group.finish();
}

fn bench_find_hit(c: &mut Criterion) {
    let n = 10_000;
    let keys: Vec<Vec<u8>> = (0..n).map(|i| format!("bench-key-{i}").into_bytes()).collect();
    let mut map: HashMap<'_, usize> = HashMap::create_seeded(4, KeyMode::Exact, [0u8; 16]);
    for (i, k) in keys.iter().enumerate() {
        map.add(k, i).unwrap();
    }

    c.bench_function("find_hit_10000", |b| {
        b.iter(|| {
            for k in &keys {
                criterion::black_box(map.find(k));
            }
        });
    });
}

criterion_group!(benches, bench_sequential_insert, bench_find_hit);
criterion_main!(benches);
