//! Encode and decode FNT fonts through glyph image directories

use std::{fs, path::Path};

use cob_rs::prelude::{
	FntError, FntHeader, Palette,
	Pixel::{Background as B, Foreground as F},
	file::fnt,
};
use image::{GrayImage, Luma};
use log::info;
use tempfile::tempdir;

fn save_gray(dir: &Path, name: &str, width: u32, height: u32, levels: &[u8]) {
	GrayImage::from_raw(width, height, levels.to_vec()).unwrap().save(dir.join(name)).unwrap();
}

fn glyph_dir(dir: &Path) {
	save_gray(dir, "a.bmp", 2, 3, &[0, 255, 255, 0, 0, 0]);
	save_gray(dir, "b_empty.bmp", 1, 1, &[255]);
	save_gray(dir, "c.bmp", 1, 3, &[255, 255, 255]);
	fs::write(dir.join("notes.txt"), b"not a glyph").unwrap();
}

#[test_log::test]
fn test_encode_directory() {
	let work = tempdir().unwrap();
	glyph_dir(work.path());

	let (bytes, summary) = fnt::encode_dir(work.path()).unwrap();
	info!("\n{}", summary);

	let header = FntHeader::from_bytes(&bytes).unwrap();
	assert!(header.has_valid_magic());
	assert_eq!((header.glyph_count, header.glyph_height), (3, 3));
	assert_eq!(summary.data_start, 28);
	assert_eq!(summary.first_pointer, Some(28));
	assert_eq!(summary.total_size as usize, bytes.len());

	// a: width 2 + 6 pixels, b: empty, c: width 1 + 3 pixels
	assert_eq!(&bytes[28..38], &[2, 0, 0, 0, 0xFF, 0xF3, 0xF3, 0xFF, 0xFF, 0xFF]);
	assert_eq!(&bytes[38..42], &[0, 0, 0, 0]);
	assert_eq!(&bytes[42..], &[1, 0, 0, 0, 0xF3, 0xF3, 0xF3]);
}

#[test_log::test]
fn test_decode_encoded_font() {
	let work = tempdir().unwrap();
	glyph_dir(work.path());
	let (bytes, _) = fnt::encode_dir(work.path()).unwrap();

	let decoded = fnt::decode(&bytes).unwrap();
	assert_eq!(decoded.glyphs.len(), 3);
	assert!(decoded.is_complete());

	// dark source pixels come back as background
	let rows: Vec<_> = decoded.glyphs[0].raster.rows().collect();
	assert_eq!(rows, [&[B, F][..], &[F, B][..], &[B, B][..]]);
	assert!(decoded.glyphs[1].is_empty());

	// The last glyph ends at the extra pointer, which is glyph 0's width word.
	assert_eq!(decoded.pointers[3], 2);
	assert_eq!(decoded.warnings.len(), 1);
	assert_eq!(decoded.warnings[0].glyph, 2);
	assert_eq!(decoded.glyphs[2].raster.pixels(), &[B, B, B]);
}

#[test_log::test]
fn test_unpack_and_repack() {
	let work = tempdir().unwrap();
	let source = work.path().join("source");
	fs::create_dir(&source).unwrap();
	glyph_dir(&source);
	let (original, _) = fnt::encode_dir(&source).unwrap();

	let glyphs = work.path().join("glyphs");
	let decoded = fnt::decode_to_dir(&original, &glyphs, Palette::default()).unwrap();
	assert!(decoded.is_complete());
	assert!(glyphs.join("glyph_0000_2x3.bmp").is_file());
	assert!(glyphs.join("glyph_0001_empty.bmp").is_file());
	assert!(glyphs.join("glyph_0002_1x3.bmp").is_file());

	let (repacked, _) = fnt::encode_dir(&glyphs).unwrap();
	assert_eq!(repacked.len(), original.len());

	// Everything up to the last glyph's pixels survives the trip.
	assert_eq!(&repacked[..46], &original[..46]);
	assert_eq!(&repacked[46..], &[0xFF, 0xFF, 0xFF]);
}

#[test_log::test]
fn test_inverted_palette() {
	let work = tempdir().unwrap();
	glyph_dir(work.path());
	let (bytes, _) = fnt::encode_dir(work.path()).unwrap();

	let output = work.path().join("out");
	fnt::decode_to_dir(&bytes, &output, Palette::inverted()).unwrap();

	let image = image::open(output.join("glyph_0000_2x3.bmp")).unwrap().to_luma8();
	assert_eq!(image.get_pixel(0, 0), &Luma([0xFF]));
	assert_eq!(image.get_pixel(1, 0), &Luma([0x00]));
}

#[test_log::test]
fn test_encode_errors() {
	let work = tempdir().unwrap();
	let result = fnt::encode_dir(work.path());
	assert!(matches!(result, Err(FntError::NoGlyphImages(_))));

	save_gray(work.path(), "x_empty.bmp", 4, 4, &[0; 16]);
	save_gray(work.path(), "y.bmp", 1, 1, &[0]);
	let result = fnt::encode_dir(work.path());
	assert!(matches!(result, Err(FntError::NoHeightDetermined)));

	fs::write(work.path().join("z.bmp"), b"BM broken").unwrap();
	let result = fnt::encode_dir(work.path());
	assert!(matches!(result, Err(FntError::ImageProcessing { ref file, .. }) if file == "z.bmp"));
}
