// -*- mode: rust; -*-
//
// This file is part of curve25519-mcu.
// See LICENSE for licensing information.

//! Benchmarks for the field/scalar arithmetic and the reduction kernels
//! beneath them, mirroring the structure of `curve25519-dalek`'s own
//! `dalek_benchmarks` criterion target.

use criterion::{criterion_group, criterion_main, Criterion};
use curve25519_mcu::{FieldElement, Scalar};

fn field_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("FieldElement");

    let a = FieldElement::from_bytes(&[
        3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
        97, 101, 103, 107, 109, 113, 127, 131, 251,
    ]);
    let b = FieldElement::from_bytes(&[
        251, 131, 127, 113, 109, 107, 103, 101, 97, 89, 83, 79, 73, 71, 67, 61, 59, 53, 47, 43,
        41, 37, 31, 29, 23, 19, 17, 13, 11, 7, 5, 3,
    ]);

    group.bench_function("add", |bencher| bencher.iter(|| a.add(&b)));
    group.bench_function("sub", |bencher| bencher.iter(|| a.sub(&b)));
    group.bench_function("mul", |bencher| bencher.iter(|| a.mul(&b)));
    group.bench_function("square", |bencher| bencher.iter(|| a.square()));
    group.bench_function("invert", |bencher| bencher.iter(|| a.invert()));
    group.bench_function("pow2523", |bencher| bencher.iter(|| a.pow2523()));
    group.bench_function("sqrt", |bencher| bencher.iter(|| a.square().sqrt()));
    group.bench_function("mpy_with_121666", |bencher| {
        bencher.iter(|| a.mpy_with_121666())
    });

    group.finish();
}

fn scalar_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scalar");

    let mut a_bytes = [0u8; 32];
    a_bytes[0] = 7;
    a_bytes[17] = 42;
    let a = Scalar::from_bytes_mod_order(&a_bytes);

    let mut b_bytes = [0u8; 32];
    b_bytes[0] = 11;
    b_bytes[30] = 3;
    let b = Scalar::from_bytes_mod_order(&b_bytes);

    group.bench_function("add", |bencher| bencher.iter(|| a.add(&b)));
    group.bench_function("sub", |bencher| bencher.iter(|| a.sub(&b)));
    group.bench_function("mul", |bencher| bencher.iter(|| a.mul(&b)));
    group.bench_function("square", |bencher| bencher.iter(|| a.square()));
    group.bench_function("to_radix_16", |bencher| bencher.iter(|| a.to_radix_16()));

    group.bench_function("invert (constant-time Fermat)", |bencher| {
        bencher.iter(|| a.invert())
    });
    group.bench_function("invert_vartime (binary extended-GCD)", |bencher| {
        bencher.iter(|| a.invert_vartime())
    });

    group.finish();
}

criterion_group!(benches, field_benchmarks, scalar_benchmarks);
criterion_main!(benches);
