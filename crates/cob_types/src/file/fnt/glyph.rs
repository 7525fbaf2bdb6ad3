//! Glyph payloads and decoded glyph rasters.

use image::{GrayImage, Luma};

use super::constants::{BACKGROUND, ENCODED_DARK, ENCODED_LIGHT, LUMA_THRESHOLD, WIDTH_SIZE};

/// Glyph payload as stored in a font file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Glyph {
	/// Zero-width placeholder, stored as four zero bytes
	Empty,

	/// Width-prefixed pixel bytes, row-major, one byte per pixel
	Bitmap {
		/// Width in pixels
		width: u32,
		/// `width * height` pixel bytes
		pixels: Vec<u8>,
	},
}

impl Glyph {
	/// Builds a bitmap glyph from a grayscale image.
	///
	/// Pixels darker than the threshold become `0xFF`, all others `0xF3`.
	pub fn from_luma(image: &GrayImage) -> Self {
		let pixels = image
			.pixels()
			.map(|Luma([l])| {
				if *l < LUMA_THRESHOLD {
					ENCODED_DARK
				} else {
					ENCODED_LIGHT
				}
			})
			.collect();

		Self::Bitmap {
			width: image.width(),
			pixels,
		}
	}

	/// Returns the glyph width, zero for an empty glyph.
	pub fn width(&self) -> u32 {
		match self {
			Self::Empty => 0,
			Self::Bitmap {
				width,
				..
			} => *width,
		}
	}

	/// Returns the number of bytes the glyph occupies in the file.
	pub fn payload_len(&self) -> usize {
		match self {
			Self::Empty => WIDTH_SIZE,
			Self::Bitmap {
				pixels,
				..
			} => WIDTH_SIZE + pixels.len(),
		}
	}

	/// Appends the payload bytes to `buffer`.
	pub fn write_to(&self, buffer: &mut Vec<u8>) {
		match self {
			Self::Empty => buffer.extend_from_slice(&0u32.to_le_bytes()),
			Self::Bitmap {
				width,
				pixels,
			} => {
				buffer.extend_from_slice(&width.to_le_bytes());
				buffer.extend_from_slice(pixels);
			}
		}
	}
}

/// Classification of a decoded pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {
	/// Byte was exactly `0xFF`
	Background,
	/// Any other byte value, including the encoder's `0xF3`
	Foreground,
}

impl Pixel {
	/// Classifies a stored pixel byte.
	pub fn from_byte(byte: u8) -> Self {
		if byte == BACKGROUND {
			Self::Background
		} else {
			Self::Foreground
		}
	}
}

/// Gray levels used when rendering a raster to an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
	/// Gray level for background pixels
	pub background: u8,
	/// Gray level for foreground pixels
	pub foreground: u8,
}

impl Default for Palette {
	fn default() -> Self {
		Self {
			background: 0x00,
			foreground: 0xFF,
		}
	}
}

impl Palette {
	/// Creates a palette with custom gray levels.
	pub fn new(background: u8, foreground: u8) -> Self {
		Self {
			background,
			foreground,
		}
	}

	/// White background with black foreground.
	pub fn inverted() -> Self {
		Self {
			background: 0xFF,
			foreground: 0x00,
		}
	}

	fn level(&self, pixel: Pixel) -> u8 {
		match pixel {
			Pixel::Background => self.background,
			Pixel::Foreground => self.foreground,
		}
	}
}

/// Two-level raster produced by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphRaster {
	width: u32,
	height: u32,
	pixels: Vec<Pixel>,
}

impl GlyphRaster {
	/// 1x1 background raster emitted for empty glyphs.
	pub fn placeholder() -> Self {
		Self {
			width: 1,
			height: 1,
			pixels: vec![Pixel::Background],
		}
	}

	/// Classifies `width * height` pixel bytes.
	///
	/// `bytes` must already hold exactly `width * height` bytes.
	pub fn from_bytes(width: u32, height: u32, bytes: &[u8]) -> Self {
		debug_assert_eq!(bytes.len(), width as usize * height as usize);
		Self {
			width,
			height,
			pixels: bytes.iter().copied().map(Pixel::from_byte).collect(),
		}
	}

	/// Returns the raster width.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Returns the raster height.
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Returns the pixels in row-major order.
	pub fn pixels(&self) -> &[Pixel] {
		&self.pixels
	}

	/// Returns the pixel at (x, y), or `None` outside the raster.
	pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
		if x >= self.width || y >= self.height {
			return None;
		}
		self.pixels.get(y as usize * self.width as usize + x as usize).copied()
	}

	/// Iterates over rows of pixels.
	pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> {
		self.pixels.chunks(self.width.max(1) as usize)
	}

	/// Renders the raster to a grayscale image.
	pub fn to_image(&self, palette: Palette) -> GrayImage {
		GrayImage::from_fn(self.width, self.height, |x, y| {
			let pixel = self.pixels[y as usize * self.width as usize + x as usize];
			Luma([palette.level(pixel)])
		})
	}

	/// Converts the raster to an ASCII art representation.
	pub fn to_ascii_art(&self, foreground: char, background: char) -> String {
		let mut art = String::with_capacity((self.width as usize + 1) * self.height as usize);
		for row in self.rows() {
			for &pixel in row {
				art.push(match pixel {
					Pixel::Foreground => foreground,
					Pixel::Background => background,
				});
			}
			art.push('\n');
		}
		art
	}
}
