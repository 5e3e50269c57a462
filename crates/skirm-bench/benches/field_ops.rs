//! Criterion micro-benchmarks for field algebra and stamping.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skirm_core::Cell;
use skirm_field::{Field, Kernel};

/// The combined cost-field expression shape at 50×50.
fn bench_field_algebra_50(c: &mut Criterion) {
    let a = Field::filled(50, 50, 1.0).unwrap();
    let b = Field::filled(50, 50, 0.5).unwrap();

    c.bench_function("field_algebra_50", |bencher| {
        bencher.iter(|| {
            let mut out = a.clone() * 50.0;
            out = out / &(b.clone() + 50.0);
            out += &b;
            black_box(out.sum());
        });
    });
}

/// Stamping 100 wide kernels — the global-field refresh workload.
fn bench_stamp_100_units(c: &mut Criterion) {
    let kernel = Kernel::plateau(12, 50.0);

    c.bench_function("stamp_100_units", |bencher| {
        bencher.iter(|| {
            let mut field = Field::new(50, 50).unwrap();
            for i in 0..100i32 {
                field.stamp_add(&kernel, Cell::new((i * 7) % 50, (i * 13) % 50), 1.0);
            }
            black_box(field.max());
        });
    });
}

criterion_group!(benches, bench_field_algebra_50, bench_stamp_100_units);
criterion_main!(benches);
