//! Collector benchmarks
//!
//! Measures holder duplication, creation with automatic passes, and full
//! passes over linked graphs of different sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use crossgc::{Collector, GcObject};

fn bench_holders(c: &mut Criterion) {
    let gc = Collector::new();
    let object: GcObject = gc.create();

    c.bench_function("duplicate_holder", |b| {
        b.iter(|| {
            let dup = black_box(object.clone());
            black_box(dup.holder_count());
        });
    });
}

fn bench_create(c: &mut Criterion) {
    let gc = Collector::new();

    c.bench_function("create_garbage", |b| {
        b.iter(|| {
            let object: GcObject = gc.create();
            black_box(object.handle());
        });
    });
}

fn bench_cleanup(c: &mut Criterion) {
    let mut group = c.benchmark_group("cleanup_chain");

    for size in [100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let gc = Collector::with_step(usize::MAX);
            let root: GcObject = gc.create();
            let mut prev = root.clone();
            for _ in 0..size {
                let next: GcObject = gc.create();
                prev.add_link(next.handle());
                prev = next;
            }
            drop(prev);

            b.iter(|| black_box(gc.cleanup()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_holders, bench_create, bench_cleanup);
criterion_main!(benches);
