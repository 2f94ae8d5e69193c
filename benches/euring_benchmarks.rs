#![allow(missing_docs)]
//! Benchmarks for the euring codec.
//!
//! Covers decoding, serialization, conversion, stream reading and parallel
//! batch decoding using Criterion.rs for statistical analysis.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use euring::parallel::decode_batch_parallel;
use euring::{convert, decode, Decoder, EuringFormat, EuringReader};
use std::io::Cursor;

const EURING2000: &str =
    "DERA0CD...5206514ZZ1877018770N0ZUPF02U-----120719760----SV55+584200+01348000101030100202301739";

const EURING2000_PLUS: &str = "GBB|A0|1234567890|0|1|ZZ|00010|00010|N|0|M|U|U|U|2|2|U|99|99|0|01012024|0|0000|AB00|+000000+0000000|1|9|99|0|4|00000|000|00000";

/// Build `count` newline-separated records alternating both fixtures.
fn build_fixture(count: usize) -> String {
    let mut data = String::new();
    for i in 0..count {
        data.push_str(if i % 2 == 0 { EURING2000 } else { EURING2000_PLUS });
        data.push('\n');
    }
    data
}

/// Benchmark decoding one record of each layout.
fn benchmark_decode(c: &mut Criterion) {
    c.bench_function("decode_euring2000", |b| {
        b.iter(|| decode(black_box(EURING2000), None));
    });
    c.bench_function("decode_euring2000_plus", |b| {
        b.iter(|| decode(black_box(EURING2000_PLUS), None));
    });
}

/// Benchmark validation plus serialization of a decoded record.
fn benchmark_serialize(c: &mut Criterion) {
    let record = decode(EURING2000, None);
    c.bench_function("serialize_euring2000", |b| {
        b.iter(|| black_box(&record).serialize());
    });
}

/// Benchmark conversion in both directions.
fn benchmark_convert(c: &mut Criterion) {
    c.bench_function("convert_2000_to_2020", |b| {
        b.iter(|| convert(black_box(EURING2000), None, EuringFormat::Euring2020, false));
    });
    c.bench_function("convert_2000plus_to_2000", |b| {
        b.iter(|| convert(black_box(EURING2000_PLUS), None, EuringFormat::Euring2000, false));
    });
}

/// Benchmark reading 1,000 records from a stream.
fn benchmark_read_1k(c: &mut Criterion) {
    let fixture = black_box(build_fixture(1_000));

    c.bench_function("read_1k_records", |b| {
        b.iter(|| {
            let mut reader = EuringReader::new(Cursor::new(fixture.as_bytes()));
            let mut count = 0;
            while let Ok(Some(_record)) = reader.read_record() {
                count += 1;
            }
            count
        });
    });
}

/// Benchmark sequential against parallel decoding of 10,000 records.
fn benchmark_parallel_10k(c: &mut Criterion) {
    let fixture = build_fixture(10_000);
    let lines: Vec<&str> = fixture.lines().collect();
    let decoder = Decoder::new();

    c.bench_function("decode_10k_sequential", |b| {
        b.iter(|| {
            lines
                .iter()
                .map(|line| decoder.decode(line))
                .filter(|r| r.errors().is_empty())
                .count()
        });
    });
    c.bench_function("decode_10k_parallel", |b| {
        b.iter(|| decode_batch_parallel(black_box(&lines), &decoder).len());
    });
}

criterion_group!(
    benches,
    benchmark_decode,
    benchmark_serialize,
    benchmark_convert,
    benchmark_read_1k,
    benchmark_parallel_10k
);
criterion_main!(benches);
