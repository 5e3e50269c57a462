//! Criterion micro-benchmarks for the pathfinder.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skirm_bench::{open_arena, walled_arena};
use skirm_core::Cell;
use skirm_path::Pathfinder;

/// Value search across a 50×50 open arena — the per-agent hot path.
fn bench_seek_open_50(c: &mut Criterion) {
    let (values, costs) = open_arena(50, 5);
    let mut pf = Pathfinder::new(50, 50).unwrap();

    c.bench_function("seek_open_50", |b| {
        b.iter(|| {
            let route = pf.seek(Cell::new(0, 0), &values, &costs);
            black_box(route.destination());
        });
    });
}

/// Value search threading walls — worst-case expansion.
fn bench_seek_walled_50(c: &mut Criterion) {
    let (values, costs) = walled_arena(50, 5);
    let mut pf = Pathfinder::new(50, 50).unwrap();

    c.bench_function("seek_walled_50", |b| {
        b.iter(|| {
            let route = pf.seek(Cell::new(0, 0), &values, &costs);
            black_box(route.score());
        });
    });
}

/// Full distance map — the coordination-pass workload.
fn bench_distances_50(c: &mut Criterion) {
    let (_, costs) = open_arena(50, 5);
    let mut pf = Pathfinder::new(50, 50).unwrap();

    c.bench_function("distances_50", |b| {
        b.iter(|| {
            let d = pf.distances(Cell::new(25, 25), &costs);
            black_box(d.sum());
        });
    });
}

criterion_group!(
    benches,
    bench_seek_open_50,
    bench_seek_walled_50,
    bench_distances_50
);
criterion_main!(benches);
