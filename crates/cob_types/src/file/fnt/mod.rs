//! Font file type support for `cob-rs` project.
//!
//! An FNT glyph container holds one bitmap per character, all of the same
//! height. Glyph widths vary and are stored in front of each bitmap.
//!
//! # File Structure
//!
//! ```text
//! [0..4)    magic 0x00002E31
//! [4..8)    glyph count
//! [8..12)   glyph height
//! [12..16)  magic 0x000000FF
//! [16..)    glyph pointers (u32, absolute file offsets)
//! [...]     glyph payloads: width (u32) followed by width * height pixel bytes,
//!           or four zero bytes for an empty glyph
//! ```
//!
//! The encoder writes one pointer per glyph. The decoder reads one extra
//! pointer and uses it as the end of the last glyph. Fonts written by the
//! encoder therefore decode their last glyph against whatever four bytes
//! follow the pointer table.

use std::fmt::Formatter;

use crate::file::error::FntError;

pub mod decode;
pub mod encode;
pub mod glyph;

pub use decode::{Decoded, DecodedGlyph, GlyphFailure, SizeMismatch, decode, decode_file, decode_to_dir};
pub use encode::{EncodeSummary, Encoder, GlyphSource, encode_dir, is_empty_marked};
pub use glyph::{Glyph, GlyphRaster, Palette, Pixel};

/// Font file constants.
pub mod constants {
	/// First header signature
	pub const MAGIC_1: u32 = 0x0000_2E31;

	/// Second header signature
	pub const MAGIC_2: u32 = 0x0000_00FF;

	/// Size of the font file header in bytes
	pub const HEADER_SIZE: usize = 16;

	/// Size of one glyph pointer in bytes
	pub const POINTER_SIZE: usize = 4;

	/// Size of the width field in front of each glyph in bytes
	pub const WIDTH_SIZE: usize = 4;

	/// Pixel byte the decoder treats as background; also used for padding
	pub const BACKGROUND: u8 = 0xFF;

	/// Pixel byte written for dark source pixels
	pub const ENCODED_DARK: u8 = 0xFF;

	/// Pixel byte written for light source pixels
	pub const ENCODED_LIGHT: u8 = 0xF3;

	/// Source luminance at or above which a pixel counts as light
	pub const LUMA_THRESHOLD: u8 = 128;

	/// File name marker for empty glyphs, matched case-insensitively
	pub const EMPTY_MARKER: &str = "_empty";

	/// Largest glyph width or height the decoder accepts
	pub const MAX_GLYPH_DIMENSION: u32 = 4096;
}

/// FNT file header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
	/// First signature
	pub magic_1: u32,
	/// Number of glyphs
	pub glyph_count: u32,
	/// Height of every glyph in pixels
	pub glyph_height: u32,
	/// Second signature
	pub magic_2: u32,
}

impl Header {
	/// Creates a header with the standard signatures.
	pub fn new(glyph_count: u32, glyph_height: u32) -> Self {
		Self {
			magic_1: constants::MAGIC_1,
			glyph_count,
			glyph_height,
			magic_2: constants::MAGIC_2,
		}
	}

	/// Parses a header from the start of `data`.
	///
	/// Signatures are not checked here; see [`Header::has_valid_magic`].
	pub fn from_bytes(data: &[u8]) -> Result<Self, FntError> {
		if data.len() < constants::HEADER_SIZE {
			return Err(FntError::InsufficientData {
				expected: constants::HEADER_SIZE,
				actual: data.len(),
			});
		}

		let word = |i: usize| u32::from_le_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);
		Ok(Self {
			magic_1: word(0),
			glyph_count: word(4),
			glyph_height: word(8),
			magic_2: word(12),
		})
	}

	/// Serializes the header to bytes.
	pub fn to_bytes(&self) -> [u8; constants::HEADER_SIZE] {
		let mut bytes = [0u8; constants::HEADER_SIZE];
		bytes[0..4].copy_from_slice(&self.magic_1.to_le_bytes());
		bytes[4..8].copy_from_slice(&self.glyph_count.to_le_bytes());
		bytes[8..12].copy_from_slice(&self.glyph_height.to_le_bytes());
		bytes[12..16].copy_from_slice(&self.magic_2.to_le_bytes());
		bytes
	}

	/// Returns `true` if both signatures match the standard values.
	pub fn has_valid_magic(&self) -> bool {
		self.magic_1 == constants::MAGIC_1 && self.magic_2 == constants::MAGIC_2
	}

	/// Returns the offset of the first glyph payload when `pointers` pointers follow the header.
	pub const fn data_start(pointers: usize) -> u64 {
		constants::HEADER_SIZE as u64 + pointers as u64 * constants::POINTER_SIZE as u64
	}
}

impl Default for Header {
	fn default() -> Self {
		Self::new(0, 0)
	}
}

impl std::fmt::Display for Header {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"FNT {{ magic: {:#010X}/{:#010X}, glyphs: {}, height: {} }}",
			self.magic_1, self.magic_2, self.glyph_count, self.glyph_height
		)
	}
}

impl TryFrom<&[u8]> for Header {
	type Error = FntError;

	fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
		Self::from_bytes(value)
	}
}

impl From<Header> for [u8; constants::HEADER_SIZE] {
	fn from(header: Header) -> Self {
		header.to_bytes()
	}
}
