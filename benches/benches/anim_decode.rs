//! Benchmark suite for animation container decoding and encoding
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! For flamegraph profiling:
//! cargo bench --manifest-path benches/Cargo.toml -- --profile-time=5

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use l5anim_benches::{RigShape, generate_container, generate_rig};
use l5anim_types::file::{
	AnimFile, AnimHeader, CompressionMethod, HeaderStyle, LayoutVersion, SaveConfig,
	anim::constants::DATA_OFFSET, compression,
};
use std::hint::black_box;

const SHAPES: [(&str, RigShape); 2] = [("small", RigShape::SMALL), ("large", RigShape::LARGE)];

/// Benchmark full container decoding for both layouts
fn bench_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("anim_decode");

	for (name, shape) in SHAPES {
		for version in [LayoutVersion::V1, LayoutVersion::V2] {
			let data = match generate_container(shape, version, &SaveConfig::default()) {
				Ok(data) => data,
				Err(e) => {
					eprintln!("Warning: Could not generate {name} {version} container: {e}");
					continue;
				}
			};

			group.throughput(Throughput::Elements(shape.node_count() as u64));
			group.bench_with_input(BenchmarkId::new(version.as_str(), name), &data, |b, data| {
				b.iter(|| {
					let result = AnimFile::from_bytes(black_box(data));
					black_box(result)
				});
			});
		}
	}

	group.finish();
}

/// Benchmark container encoding without compression
fn bench_encode(c: &mut Criterion) {
	let mut group = c.benchmark_group("anim_encode");

	for (name, shape) in SHAPES {
		for version in [LayoutVersion::V1, LayoutVersion::V2] {
			let anim = generate_rig(shape, version);
			let config = SaveConfig::uncompressed();

			group.throughput(Throughput::Elements(shape.node_count() as u64));
			group.bench_with_input(BenchmarkId::new(version.as_str(), name), &anim, |b, anim| {
				b.iter(|| {
					let result = anim.to_bytes_with_config(black_box(&config));
					black_box(result)
				});
			});
		}
	}

	group.finish();
}

/// Benchmark the block codecs on a large internal block
fn bench_compression(c: &mut Criterion) {
	let mut group = c.benchmark_group("anim_compression");

	let config = SaveConfig::new(CompressionMethod::None, HeaderStyle::Auto);
	let block = match generate_container(RigShape::LARGE, LayoutVersion::V2, &config) {
		Ok(data) => data[DATA_OFFSET + compression::BLOCK_HEADER_SIZE..].to_vec(),
		Err(e) => {
			eprintln!("Warning: Could not generate block for compression benchmark: {e}");
			return;
		}
	};

	group.throughput(Throughput::Bytes(block.len() as u64));
	group.sample_size(20);

	for method in [CompressionMethod::Lz10, CompressionMethod::Rle, CompressionMethod::Zlib] {
		let packed = match compression::compress(&block, method) {
			Ok(packed) => packed,
			Err(e) => {
				eprintln!("Warning: Could not compress with {method}: {e}");
				continue;
			}
		};

		group.bench_with_input(BenchmarkId::new("compress", method), &block, |b, block| {
			b.iter(|| black_box(compression::compress(black_box(block), method)));
		});
		group.bench_with_input(BenchmarkId::new("decompress", method), &packed, |b, packed| {
			b.iter(|| black_box(compression::decompress(black_box(packed))));
		});
	}

	group.finish();
}

/// Benchmark header parsing separately
fn bench_header_parsing(c: &mut Criterion) {
	let mut group = c.benchmark_group("anim_header");

	let data = match generate_container(RigShape::SMALL, LayoutVersion::V2, &SaveConfig::default()) {
		Ok(data) => data,
		Err(e) => {
			eprintln!("Warning: Could not generate container for header benchmark: {e}");
			return;
		}
	};

	group.bench_function("parse_header", |b| {
		b.iter(|| {
			let result = AnimHeader::from_bytes(black_box(&data));
			black_box(result)
		});
	});

	group.finish();
}

criterion_group!(benches, bench_decode, bench_encode, bench_compression, bench_header_parsing);

criterion_main!(benches);
