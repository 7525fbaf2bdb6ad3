//! FNT decoder: glyph container to per-glyph rasters.
//!
//! Decoding is best effort. The header and pointer table must be readable,
//! but a broken glyph is logged, recorded in [`Decoded::failures`] and
//! skipped, and the remaining glyphs are still decoded.

use std::{fmt::Display, fs, path::Path};

use log::{error, info, warn};

use super::{
	Header,
	constants::{BACKGROUND, HEADER_SIZE, MAGIC_1, MAGIC_2, MAX_GLYPH_DIMENSION, POINTER_SIZE, WIDTH_SIZE},
	glyph::{GlyphRaster, Palette},
};
use crate::file::error::FntError;

/// A glyph whose pixel data did not match `width * height`.
///
/// Short data is padded with background bytes, long data is cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeMismatch {
	/// Glyph index
	pub glyph: usize,
	/// `width * height`
	pub expected: usize,
	/// Bytes available between the width field and the next pointer
	pub actual: usize,
}

impl Display for SizeMismatch {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let kind = if self.actual < self.expected {
			"incomplete"
		} else {
			"extra data"
		};
		write!(
			f,
			"Glyph {} {}. Expected {} bytes, got {}",
			self.glyph, kind, self.expected, self.actual
		)
	}
}

/// A glyph that was skipped.
#[derive(Debug)]
pub struct GlyphFailure {
	/// Glyph index
	pub glyph: usize,
	/// Why it was skipped
	pub error: FntError,
}

/// A successfully decoded glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedGlyph {
	/// Glyph index
	pub index: usize,
	/// Width stored in the payload, zero for empty glyphs
	pub width: u32,
	/// Decoded pixels; a 1x1 background raster for empty glyphs
	pub raster: GlyphRaster,
}

impl DecodedGlyph {
	/// Returns `true` for zero-width glyphs.
	pub fn is_empty(&self) -> bool {
		self.width == 0
	}

	/// File name used when writing the glyph out as an image.
	///
	/// Names sort in glyph order and carry the empty marker the encoder
	/// looks for.
	pub fn file_name(&self) -> String {
		if self.is_empty() {
			format!("glyph_{:04}_empty.bmp", self.index)
		} else {
			format!("glyph_{:04}_{}x{}.bmp", self.index, self.raster.width(), self.raster.height())
		}
	}
}

/// Result of decoding a font.
#[derive(Debug)]
pub struct Decoded {
	/// Parsed header
	pub header: Header,
	/// `glyph_count + 1` pointers as read from the file
	pub pointers: Vec<u32>,
	/// Glyphs that decoded, in index order
	pub glyphs: Vec<DecodedGlyph>,
	/// Non-fatal size mismatches
	pub warnings: Vec<SizeMismatch>,
	/// Glyphs that were skipped, in index order
	pub failures: Vec<GlyphFailure>,
}

impl Decoded {
	/// Returns `true` if every glyph decoded.
	pub fn is_complete(&self) -> bool {
		self.failures.is_empty()
	}

	/// Returns the indices of skipped glyphs.
	pub fn skipped(&self) -> impl Iterator<Item = usize> + '_ {
		self.failures.iter().map(|f| f.glyph)
	}
}

/// Decodes a font from bytes.
pub fn decode(data: &[u8]) -> Result<Decoded, FntError> {
	let header = Header::from_bytes(data)?;

	if header.magic_1 != MAGIC_1 {
		warn!("Unexpected signature {:#010X}, expected {:#010X}", header.magic_1, MAGIC_1);
	}
	if header.magic_2 != MAGIC_2 {
		warn!("Unexpected second signature {:#010X}, expected {:#010X}", header.magic_2, MAGIC_2);
	}
	info!("Signature: {:#010X}", header.magic_1);
	info!("Total glyphs: {}", header.glyph_count);
	info!("Glyph height: {}", header.glyph_height);

	let count = header.glyph_count as usize;
	let table_end = Header::data_start(count + 1);
	if (data.len() as u64) < table_end {
		return Err(FntError::TruncatedFile {
			expected: table_end as usize,
			actual: data.len(),
		});
	}

	let pointers: Vec<u32> = data[HEADER_SIZE..table_end as usize]
		.chunks_exact(POINTER_SIZE)
		.map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
		.collect();

	let mut decoded = Decoded {
		header,
		pointers: Vec::new(),
		glyphs: Vec::with_capacity(count),
		warnings: Vec::new(),
		failures: Vec::new(),
	};

	for (index, bounds) in pointers.windows(2).enumerate() {
		match decode_glyph(data, index, bounds[0], bounds[1], header.glyph_height, &mut decoded.warnings) {
			Ok(glyph) => decoded.glyphs.push(glyph),
			Err(error) => {
				error!("Error processing glyph {}: {}", index, error);
				decoded.failures.push(GlyphFailure {
					glyph: index,
					error,
				});
			}
		}
	}

	decoded.pointers = pointers;
	Ok(decoded)
}

/// Reads a font file and decodes it.
pub fn decode_file(path: impl AsRef<Path>) -> Result<Decoded, FntError> {
	let data = fs::read(path)?;
	decode(&data)
}

/// Decodes a font and writes each glyph as a BMP file below `dir`.
///
/// Glyphs that fail to save are moved from [`Decoded::glyphs`] to
/// [`Decoded::failures`]; the remaining glyphs are still written.
pub fn decode_to_dir(data: &[u8], dir: impl AsRef<Path>, palette: Palette) -> Result<Decoded, FntError> {
	let dir = dir.as_ref();
	let mut decoded = decode(data)?;
	fs::create_dir_all(dir)?;

	let glyphs = std::mem::take(&mut decoded.glyphs);
	for glyph in glyphs {
		let path = dir.join(glyph.file_name());
		match glyph.raster.to_image(palette).save(&path) {
			Ok(()) => {
				if glyph.is_empty() {
					info!("Saved empty {}", path.display());
				} else {
					info!("Saved {}", path.display());
				}
				decoded.glyphs.push(glyph);
			}
			Err(e) => {
				error!("Error processing glyph {}: {}", glyph.index, e);
				decoded.failures.push(GlyphFailure {
					glyph: glyph.index,
					error: e.into(),
				});
			}
		}
	}

	decoded.failures.sort_by_key(|f| f.glyph);
	Ok(decoded)
}

fn decode_glyph(
	data: &[u8],
	index: usize,
	start: u32,
	end: u32,
	height: u32,
	warnings: &mut Vec<SizeMismatch>,
) -> Result<DecodedGlyph, FntError> {
	let start_pos = start as usize;
	let pixels_start = start_pos.checked_add(WIDTH_SIZE).filter(|&p| p <= data.len()).ok_or(
		FntError::InvalidPointer {
			glyph: index,
			pointer: start,
			length: data.len(),
		},
	)?;

	let width = u32::from_le_bytes([
		data[start_pos],
		data[start_pos + 1],
		data[start_pos + 2],
		data[start_pos + 3],
	]);
	if width == 0 {
		return Ok(DecodedGlyph {
			index,
			width,
			raster: GlyphRaster::placeholder(),
		});
	}

	if width > MAX_GLYPH_DIMENSION || height > MAX_GLYPH_DIMENSION {
		return Err(FntError::GlyphTooLarge {
			glyph: index,
			width,
			height,
		});
	}

	// An end pointer before the pixel data gives an empty span; one past EOF is clamped.
	let pixels_end = (end as usize).clamp(pixels_start, data.len());
	let mut pixels = data[pixels_start..pixels_end].to_vec();

	let expected = width as usize * height as usize;
	let actual = pixels.len();
	if actual != expected {
		let mismatch = SizeMismatch {
			glyph: index,
			expected,
			actual,
		};
		warn!("Warning: {}", mismatch);
		warnings.push(mismatch);
		pixels.resize(expected, BACKGROUND);
	}

	Ok(DecodedGlyph {
		index,
		width,
		raster: GlyphRaster::from_bytes(width, height, &pixels),
	})
}
