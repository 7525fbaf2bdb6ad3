//! Benchmark helper utilities for cob-rs
//!
//! This module provides generators for synthetic archives and fonts so the
//! benchmarks run without game data.

use cob_types::file::{CobBuilder, GlyphSource, fnt::Header};
use image::{GrayImage, Luma};

/// Generates an archive with `count` entries of `payload_size` bytes each.
///
/// Entries are spread over a handful of directories to exercise path
/// normalization.
pub fn generate_test_archive(count: usize, payload_size: usize) -> Vec<u8> {
	let mut builder = CobBuilder::new();
	for i in 0..count {
		let payload: Vec<u8> = (0..payload_size).map(|j| (i + j) as u8).collect();
		builder.add(format!("DIR{:02}/FILE{:05}.DAT", i % 16, i), payload);
	}

	// Synthetic paths are short ASCII and always fit
	builder.to_bytes().unwrap_or_default()
}

/// Generates a decodable font with `count` glyphs of `width` x `height`.
///
/// The pointer table carries the extra end pointer, so every glyph decodes
/// without size warnings.
pub fn generate_test_font(count: u32, width: u32, height: u32) -> Vec<u8> {
	let payload_len = 4 + (width * height) as usize;
	let data_start = Header::data_start(count as usize + 1) as usize;

	let mut data = Vec::with_capacity(data_start + payload_len * count as usize);
	data.extend_from_slice(&Header::new(count, height).to_bytes());

	for i in 0..=count as usize {
		let pointer = (data_start + i * payload_len) as u32;
		data.extend_from_slice(&pointer.to_le_bytes());
	}

	for i in 0..count {
		data.extend_from_slice(&width.to_le_bytes());
		// checkerboard of background/foreground bytes
		data.extend((0..width * height).map(|p| if (p + i) % 2 == 0 { 0xFF } else { 0xF3 }));
	}

	data
}

/// Generates glyph sources ready for the encoder.
pub fn generate_glyph_sources(count: u32, width: u32, height: u32) -> Vec<GlyphSource> {
	(0..count)
		.map(|i| {
			let image = GrayImage::from_fn(width, height, |x, y| Luma([((x + y + i) % 2 * 255) as u8]));
			GlyphSource::new(format!("glyph_{:04}.bmp", i), image)
		})
		.collect()
}
