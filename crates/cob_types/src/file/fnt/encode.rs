//! FNT encoder: grayscale glyph images to a glyph container.

use std::{fmt::Display, fs, path::Path};

use image::{DynamicImage, GrayImage, Luma};
use log::{debug, info, warn};

use super::{Header, constants::EMPTY_MARKER, glyph::Glyph};
use crate::file::error::FntError;

/// Returns `true` if `name` marks an empty glyph.
pub fn is_empty_marked(name: &str) -> bool {
	name.to_lowercase().contains(EMPTY_MARKER)
}

/// One named glyph image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphSource {
	name: String,
	image: GrayImage,
}

impl GlyphSource {
	/// Creates a source from an already grayscale image.
	pub fn new(name: impl Into<String>, image: GrayImage) -> Self {
		Self {
			name: name.into(),
			image,
		}
	}

	/// Loads an image file and converts it to grayscale.
	///
	/// Failures name the file in [`FntError::ImageProcessing`].
	pub fn load(path: impl AsRef<Path>) -> Result<Self, FntError> {
		let path = path.as_ref();
		let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
		let image = image::open(path).map_err(|source| FntError::ImageProcessing {
			file: name.clone(),
			source,
		})?;

		Ok(Self {
			name,
			image: grayscale(&image),
		})
	}

	/// Returns the source name used for ordering and the empty marker.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the grayscale image.
	pub fn image(&self) -> &GrayImage {
		&self.image
	}

	/// Returns `true` if the name marks an empty glyph.
	pub fn is_empty_marked(&self) -> bool {
		is_empty_marked(&self.name)
	}

	fn is_placeholder(&self) -> bool {
		self.image.dimensions() == (1, 1)
	}
}

/// Converts an image to 8-bit luminance with ITU-R 601-2 weights.
///
/// Grayscale inputs pass through unchanged; alpha is ignored.
pub fn grayscale(image: &DynamicImage) -> GrayImage {
	if let DynamicImage::ImageLuma8(gray) = image {
		return gray.clone();
	}

	let rgb = image.to_rgb8();
	GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
		let [r, g, b] = rgb.get_pixel(x, y).0;
		let l = (u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16;
		Luma([l as u8])
	})
}

/// Figures reported after a successful encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
	/// Number of glyphs written
	pub glyph_count: u32,
	/// Font height in pixels
	pub glyph_height: u32,
	/// Offset of the first glyph payload
	pub data_start: u32,
	/// Value of the first pointer, if any glyph was written
	pub first_pointer: Option<u32>,
	/// Total size of the encoded font in bytes
	pub total_size: u32,
}

impl Display for EncodeSummary {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "Total glyphs: {}", self.glyph_count)?;
		writeln!(f, "Font height: {}px", self.glyph_height)?;
		writeln!(f, "Data starts at: {:#06X}", self.data_start)?;
		if let Some(pointer) = self.first_pointer {
			writeln!(f, "First glyph pointer: {:#06X}", pointer)?;
		}
		write!(f, "Total file size: {} bytes", self.total_size)
	}
}

/// Collects glyph images and encodes them into a font.
///
/// Glyph order is the ascending byte order of source names, regardless of
/// push order.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
	sources: Vec<GlyphSource>,
}

impl Encoder {
	/// Creates an empty encoder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a glyph image.
	pub fn push(&mut self, source: GlyphSource) -> &mut Self {
		self.sources.push(source);
		self
	}

	/// Returns the number of glyphs collected so far.
	pub fn len(&self) -> usize {
		self.sources.len()
	}

	/// Returns `true` if no glyph has been added.
	pub fn is_empty(&self) -> bool {
		self.sources.is_empty()
	}

	/// Picks the font height from the first source that is neither marked
	/// empty nor a 1x1 placeholder.
	fn glyph_height(sources: &[GlyphSource]) -> Result<u32, FntError> {
		sources
			.iter()
			.find(|s| !s.is_empty_marked() && !s.is_placeholder())
			.map(|s| s.image.height())
			.ok_or(FntError::NoHeightDetermined)
	}

	/// Encodes the collected glyphs.
	///
	/// Writes the header, one pointer per glyph and the payloads. No pointer
	/// follows the last glyph.
	pub fn encode(mut self) -> Result<(Vec<u8>, EncodeSummary), FntError> {
		self.sources.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));

		let glyph_height = Self::glyph_height(&self.sources)?;
		let glyph_count = u32::try_from(self.sources.len()).map_err(|_| FntError::FontTooLarge {
			size: Header::data_start(self.sources.len()),
		})?;

		let glyphs: Vec<Glyph> = self
			.sources
			.iter()
			.map(|source| {
				if source.is_empty_marked() {
					debug!("{}: empty glyph", source.name);
					return Glyph::Empty;
				}
				if source.image.height() != glyph_height {
					warn!(
						"{}: height {} differs from font height {}",
						source.name,
						source.image.height(),
						glyph_height
					);
				}
				Glyph::from_luma(&source.image)
			})
			.collect();

		let data_start = Header::data_start(glyphs.len());
		let total_size = glyphs.iter().fold(data_start, |acc, g| acc + g.payload_len() as u64);
		if total_size > u64::from(u32::MAX) {
			return Err(FntError::FontTooLarge {
				size: total_size,
			});
		}

		let mut buffer = Vec::with_capacity(total_size as usize);
		buffer.extend_from_slice(&Header::new(glyph_count, glyph_height).to_bytes());

		let mut current = data_start as u32;
		for glyph in &glyphs {
			buffer.extend_from_slice(&current.to_le_bytes());
			current += glyph.payload_len() as u32;
		}
		debug_assert_eq!(buffer.len(), data_start as usize);

		for glyph in &glyphs {
			glyph.write_to(&mut buffer);
		}

		let first_pointer = (!glyphs.is_empty()).then_some(data_start as u32);
		let summary = EncodeSummary {
			glyph_count,
			glyph_height,
			data_start: data_start as u32,
			first_pointer,
			total_size: total_size as u32,
		};

		Ok((buffer, summary))
	}
}

impl Extend<GlyphSource> for Encoder {
	fn extend<T: IntoIterator<Item = GlyphSource>>(&mut self, iter: T) {
		self.sources.extend(iter);
	}
}

impl FromIterator<GlyphSource> for Encoder {
	fn from_iter<T: IntoIterator<Item = GlyphSource>>(iter: T) -> Self {
		Self {
			sources: iter.into_iter().collect(),
		}
	}
}

/// Encodes every `.bmp` file directly inside `dir` into a font.
///
/// Stops at the first image that cannot be loaded.
pub fn encode_dir(dir: impl AsRef<Path>) -> Result<(Vec<u8>, EncodeSummary), FntError> {
	let dir = dir.as_ref();

	let mut paths = Vec::new();
	for item in fs::read_dir(dir)? {
		let path = item?.path();
		let is_bmp = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"));
		if is_bmp && path.is_file() {
			paths.push(path);
		}
	}

	if paths.is_empty() {
		return Err(FntError::NoGlyphImages(dir.to_path_buf()));
	}
	paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

	let encoder = paths.iter().map(GlyphSource::load).collect::<Result<Encoder, _>>()?;
	let (bytes, summary) = encoder.encode()?;

	info!("Encoded {} glyphs from {}", summary.glyph_count, dir.display());
	for line in summary.to_string().lines() {
		info!("{}", line);
	}

	Ok((bytes, summary))
}
