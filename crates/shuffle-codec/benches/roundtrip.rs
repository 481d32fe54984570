// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec Round-Trip Benchmark
//!
//! Measures encode, decode and size estimation for shapes typical of shuffle
//! records:
//! - flat `Vec<i64>` (fixed-width elements)
//! - `Vec<(String, Option<u32>)>` (variable-width composite elements)
//! - `HashMap<String, Vec<u8>>` (associative, per-entry dispatch)
//!
//! Estimation is compared against a full encode into a counting sink.

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shuffle_codec::{
    decode_from_slice, encode_to_vec, encoded_size, estimate_size, resolve_codec, Resolve,
};
use std::collections::HashMap;

fn bench_shape<T: Resolve>(c: &mut Criterion, name: &str, value: &T) {
    let codec = resolve_codec::<T>();
    let bytes = encode_to_vec(&codec, value).expect("encode");

    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function(BenchmarkId::new("encode", bytes.len()), |b| {
        b.iter(|| encode_to_vec(&codec, black_box(value)).expect("encode"));
    });
    group.bench_function(BenchmarkId::new("decode", bytes.len()), |b| {
        b.iter(|| decode_from_slice(&codec, black_box(&bytes)).expect("decode"));
    });
    group.bench_function(BenchmarkId::new("estimate", bytes.len()), |b| {
        b.iter(|| estimate_size(&codec, black_box(value)).expect("estimate"));
    });
    group.bench_function(BenchmarkId::new("counting_encode", bytes.len()), |b| {
        b.iter(|| encoded_size(&codec, black_box(value)).expect("size"));
    });
    group.finish();
}

fn bench_fixed_width(c: &mut Criterion) {
    let value: Vec<i64> = (0..4096).collect();
    bench_shape(c, "vec_i64", &value);
}

fn bench_composite(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(42);
    let value: Vec<(String, Option<u32>)> = (0..1024)
        .map(|i| {
            let key: String = (0..rng.usize(4..32)).map(|_| rng.alphanumeric()).collect();
            let count = if i % 3 == 0 { None } else { Some(rng.u32(..)) };
            (key, count)
        })
        .collect();
    bench_shape(c, "vec_string_option", &value);
}

fn bench_map(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(7);
    let value: HashMap<String, Vec<u8>> = (0..512)
        .map(|i| {
            let payload = (0..rng.usize(0..64)).map(|_| rng.u8(..)).collect();
            (format!("key-{}", i), payload)
        })
        .collect();
    bench_shape(c, "hash_map_bytes", &value);
}

criterion_group!(benches, bench_fixed_width, bench_composite, bench_map);
criterion_main!(benches);
