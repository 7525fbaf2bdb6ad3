//! Benchmark suite for COB archive parsing and packing
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench cob_parse

use cob_benches::generate_test_archive;
use cob_types::file::{CobBuilder, CobIndex};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::{hint::black_box, io::Cursor};

/// Benchmark index parsing for growing entry counts
fn bench_parse_index(c: &mut Criterion) {
	let mut group = c.benchmark_group("cob_index");

	for count in [16usize, 256, 4096] {
		let data = generate_test_archive(count, 64);
		group.throughput(Throughput::Elements(count as u64));
		group.bench_with_input(BenchmarkId::new("from_bytes", count), &data, |b, data| {
			b.iter(|| {
				let result = CobIndex::from_bytes(black_box(data));
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark reading every payload back through the index
fn bench_read_entries(c: &mut Criterion) {
	let mut group = c.benchmark_group("cob_read");

	let data = generate_test_archive(256, 4096);
	let index = match CobIndex::from_bytes(&data) {
		Ok(index) => index,
		Err(e) => {
			eprintln!("Warning: Could not parse generated archive: {}", e);
			return;
		}
	};

	group.throughput(Throughput::Bytes(data.len() as u64));
	group.bench_function("read_all", |b| {
		b.iter(|| {
			let mut reader = Cursor::new(black_box(&data));
			let total: usize = index
				.entries()
				.iter()
				.filter_map(|entry| entry.read_from(&mut reader).ok())
				.map(|payload| payload.len())
				.sum();
			black_box(total)
		});
	});

	group.finish();
}

/// Benchmark building an archive in memory
fn bench_pack(c: &mut Criterion) {
	let mut group = c.benchmark_group("cob_pack");

	let payload = vec![0xA5u8; 1024];
	group.bench_function("to_bytes_512", |b| {
		b.iter(|| {
			let mut builder = CobBuilder::new();
			for i in 0..512 {
				builder.add(format!("DATA/FILE{:04}.BIN", i), payload.clone());
			}
			black_box(builder.to_bytes())
		});
	});

	group.finish();
}

criterion_group!(benches, bench_parse_index, bench_read_entries, bench_pack);
criterion_main!(benches);
