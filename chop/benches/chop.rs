//! End-to-end chop benchmarks on modules built from known irreducibles.

use std::sync::Arc;

use chop::{chop, ChopOptions};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mtx::{Field, Matrix};

/// Companion of the monic polynomial with low coefficients `low`, over GF(2).
fn companion(f: &Arc<Field>, low: &[u8]) -> Matrix {
    let n = low.len();
    let mut m = Matrix::zero(f.clone(), n, n);
    for i in 0..n - 1 {
        m.set(i, i + 1, 1);
    }
    for (j, &c) in low.iter().enumerate() {
        m.set(n - 1, j, c);
    }
    m
}

/// `copies` diagonal copies of the module (companion of `low`, E11).
fn homogeneous(f: &Arc<Field>, low: &[u8], copies: usize) -> Vec<Matrix> {
    let k = low.len();
    let n = k * copies;
    let c = companion(f, low);
    let mut a = Matrix::zero(f.clone(), n, n);
    let mut b = Matrix::zero(f.clone(), n, n);
    for block in 0..copies {
        let o = block * k;
        for i in 0..k {
            for j in 0..k {
                a.set(o + i, o + j, c.get(i, j));
            }
        }
        b.set(o, o, 1);
    }
    vec![a, b]
}

fn bench_chop(c: &mut Criterion) {
    let mut group = c.benchmark_group("chop");
    group.sample_size(20);
    let f = Arc::new(Field::new(2).unwrap());
    // x^5+x^2+1
    let low = [1u8, 0, 1, 0, 0];
    for copies in [1usize, 2, 4] {
        let gens = homogeneous(&f, &low, copies);
        group.bench_with_input(BenchmarkId::new("homogeneous_5", copies), &copies, |bench, _| {
            bench.iter(|| black_box(chop(gens.clone(), ChopOptions::default()).unwrap()));
        });
    }
    let identity = vec![Matrix::identity(f.clone(), 16)];
    group.bench_function("identity_16", |bench| {
        bench.iter(|| black_box(chop(identity.clone(), ChopOptions::default()).unwrap()));
    });
    group.finish();
}

criterion_group!(benches, bench_chop);
criterion_main!(benches);
