//! Context-construction cost: how expensive one `create_server`/
//! `new_session` pair is, since callers are expected to cache the result
//! via `dnscore_cache::Cache` rather than rebuild per connection.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use dnscore_tls::cb::{create_server, CbConfig};
use dnscore_tls::logger::NullLogger;
use dnscore_tls::{eig, pi};

fn bench_ephemeral_identity(c: &mut Criterion) {
    pi::initialize();
    c.bench_function("eig_generate_ephemeral_identity", |b| {
        b.iter(|| {
            let identity = eig::generate_ephemeral_identity(eig::EPHEMERAL_CERT_PRODUCT).unwrap();
            criterion::black_box(identity);
        });
    });
}

fn bench_create_server_with_ephemeral_identity(c: &mut Criterion) {
    pi::initialize();
    let config = CbConfig::default();
    c.bench_function("cb_create_server_ephemeral", |b| {
        b.iter(|| {
            let ctx = create_server(&config, None, None, Arc::new(NullLogger)).unwrap();
            criterion::black_box(ctx);
        });
    });
}

fn bench_new_session_from_built_context(c: &mut Criterion) {
    pi::initialize();
    let config = CbConfig::default();
    let ctx = create_server(&config, None, None, Arc::new(NullLogger)).unwrap();
    c.bench_function("cb_new_session", |b| {
        b.iter(|| {
            criterion::black_box(ctx.new_session().unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_ephemeral_identity,
    bench_create_server_with_ephemeral_identity,
    bench_new_session_from_built_context
);
criterion_main!(benches);
