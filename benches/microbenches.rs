//! Criterion microbenches for penguinview's hot paths.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - query-string decoding and encoding (decode_query, encode_query)
//! - the filter pipeline over a synthetic dataset (filter_records)
//! - histogram binning of the filtered rows

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use penguinview::aggregate::histogram;
use penguinview::data::io_json::from_json_str;
use penguinview::data::{transform_records, NumericField, Record};
use penguinview::url_state::{decode_query, encode_query};

const QUERY: &str = "chart=histogram&field=body_mass_g&bins=18&species=gentoo,adelie\
&island=Dream&sex=female&diet=fish,krill&lifeStage=adult&years=2022-2024";

// Include test fixtures at compile time (no file I/O during benchmark)
const DATASET_FIXTURE: &str = include_str!("../tests/fixtures/penguins_small.json");

/// The fixture repeated until it resembles the real asset's size.
fn synthetic_records() -> Vec<Record> {
    let raw = from_json_str(DATASET_FIXTURE).expect("Failed to parse dataset fixture");
    let base = transform_records(&raw);
    base.iter().cycle().take(3_000).cloned().collect()
}

/// Benchmark query-string decoding.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("url_state");
    group.throughput(Throughput::Bytes(QUERY.len() as u64));

    group.bench_function("decode_query", |b| {
        b.iter(|| {
            let state = decode_query(black_box(QUERY));
            black_box(state)
        })
    });

    group.finish();
}

/// Benchmark query-string encoding of a fully populated state.
fn bench_encode(c: &mut Criterion) {
    let state = decode_query(QUERY);
    let mut group = c.benchmark_group("url_state");

    group.bench_function("encode_query", |b| {
        b.iter(|| {
            let query = encode_query(black_box(&state));
            black_box(query)
        })
    });

    group.finish();
}

/// Benchmark the six-stage filter pipeline followed by binning.
///
/// Records are built once (outside the timed region).
fn bench_filter_and_bin(c: &mut Criterion) {
    let records = synthetic_records();
    let state = decode_query("chart=histogram&species=Adelie,Gentoo&years=2022-2025");

    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(records.len() as u64));

    group.bench_function("filter_records", |b| {
        b.iter(|| {
            let shown = penguinview::filter::filter_records(black_box(&records), &state.filters);
            black_box(shown.len())
        })
    });

    group.bench_function("filter_then_histogram", |b| {
        b.iter(|| {
            let shown = penguinview::filter::filter_records(black_box(&records), &state.filters);
            let bins = histogram(&shown, NumericField::BodyMassG, 24);
            black_box(bins)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_decode, bench_encode, bench_filter_and_bin);
criterion_main!(benches);
