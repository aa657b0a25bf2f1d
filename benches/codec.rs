// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Benchmarks for key and row codecs.

use celestite::codec::{
    decode_row, encode_composite, encode_row, FieldDescriptor, FieldValue,
};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};

fn bench_composite_key(c: &mut Criterion) {
    let dept = FieldDescriptor::text();
    let rank = FieldDescriptor::integer(4);
    let id = FieldDescriptor::integer(8);

    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Elements(1));

    group.bench_function("encode_composite_3col", |b| {
        b.iter_batched(
            || {
                let dept_value = FieldValue::text(match rand::random::<u8>() % 3 {
                    0 => "eng",
                    1 => "sales",
                    _ => "support",
                });
                let rank_value = FieldValue::Integer((rand::random::<i32>() % 100) as i64);
                let id_value = FieldValue::Integer(rand::random::<i64>());
                (dept_value, rank_value, id_value)
            },
            |(dept_value, rank_value, id_value)| {
                encode_composite(&[
                    (&dept, &dept_value),
                    (&rank, &rank_value),
                    (&id, &id_value),
                ])
                .unwrap()
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_row_codec(c: &mut Criterion) {
    let schema = vec![
        FieldDescriptor::integer(8),
        FieldDescriptor::text().nullable(),
        FieldDescriptor::integer(4).nullable(),
        FieldDescriptor::other().nullable(),
    ];
    let row = vec![
        FieldValue::Integer(42),
        FieldValue::text("a reasonably sized text value"),
        FieldValue::Null,
        FieldValue::Other(vec![0xAB; 64]),
    ];
    let encoded = encode_row(&row, &schema).unwrap();

    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Elements(1));

    group.bench_function("encode_row_4col", |b| {
        b.iter(|| encode_row(&row, &schema).unwrap())
    });

    group.bench_function("decode_row_4col", |b| {
        b.iter(|| decode_row(&encoded, &schema).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_composite_key, bench_row_codec);
criterion_main!(benches);
