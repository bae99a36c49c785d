//! Benchmarks for value coercion and decimal precision computation.

#![allow(clippy::unwrap_used, missing_docs)]

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use mssql_types::{DecimalShape, SqlType, SqlValue, coerce, parse_decimal};
use std::hint::black_box;

/// Benchmark numeric coercion from text (the common path for untyped input).
fn bench_coerce_numeric(c: &mut Criterion) {
    let mut group = c.benchmark_group("coerce_numeric");

    let int_text = SqlValue::from("1234567");
    group.bench_function("integer_from_text", |b| {
        b.iter(|| black_box(coerce(SqlType::Integer, black_box(&int_text)).unwrap()))
    });

    let int_value = SqlValue::BigInt(9_876_543_210);
    group.bench_function("bigint_from_i64", |b| {
        b.iter(|| black_box(coerce(SqlType::BigInt, black_box(&int_value)).unwrap()))
    });

    let float_text = SqlValue::from("3.14159265358979");
    group.bench_function("double_from_text", |b| {
        b.iter(|| black_box(coerce(SqlType::Double, black_box(&float_text)).unwrap()))
    });

    let decimal_text = SqlValue::from("-12345.678900");
    group.bench_function("decimal_from_text", |b| {
        b.iter(|| black_box(coerce(SqlType::Decimal, black_box(&decimal_text)).unwrap()))
    });

    group.finish();
}

/// Benchmark character coercion, which counts UTF-16 code units.
fn bench_coerce_character(c: &mut Criterion) {
    let mut group = c.benchmark_group("coerce_character");

    let short = SqlValue::from("Hello");
    group.bench_function("short", |b| {
        b.iter(|| black_box(coerce(SqlType::NVarChar, black_box(&short)).unwrap()))
    });

    let long_text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(64);
    group.throughput(Throughput::Bytes(long_text.len() as u64));
    let long = SqlValue::from(long_text);
    group.bench_function("long", |b| {
        b.iter(|| black_box(coerce(SqlType::NVarChar, black_box(&long)).unwrap()))
    });

    let unicode = SqlValue::from("日本語テスト文字列 émoji et accénts");
    group.bench_function("unicode", |b| {
        b.iter(|| black_box(coerce(SqlType::NVarChar, black_box(&unicode)).unwrap()))
    });

    group.finish();
}

/// Benchmark decimal shape computation and widening.
fn bench_decimal_shape(c: &mut Criterion) {
    let mut group = c.benchmark_group("decimal_shape");

    let small = parse_decimal("0.01").unwrap();
    let large = parse_decimal("7922816251426433759354395.0335").unwrap();

    group.bench_function("of_small", |b| b.iter(|| black_box(DecimalShape::of(black_box(&small)))));
    group.bench_function("of_large", |b| b.iter(|| black_box(DecimalShape::of(black_box(&large)))));

    let column = DecimalShape::new(18, 4);
    let value = DecimalShape::new(12, 6);
    group.bench_function("widen", |b| {
        b.iter(|| black_box(black_box(column).widen(black_box(value)).unwrap()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_coerce_numeric,
    bench_coerce_character,
    bench_decimal_shape,
);
criterion_main!(benches);
