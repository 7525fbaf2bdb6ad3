//! Error types for file format parsing and manipulation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing, packing or extracting COB archives
#[derive(Debug, Error)]
pub enum CobError {
	/// Not enough data for the header and tables announced by the entry count
	#[error("Insufficient data: expected at least {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Offset table entry is out of order or points past the end of the archive
	#[error("Invalid offset for entry {index}: {offset:#010X} (previous {previous:#010X}, archive length {length})")]
	InvalidOffset {
		/// Entry index
		index: usize,
		/// Offending offset
		offset: u32,
		/// Offset of the previous entry, or 0 for the first entry
		previous: u32,
		/// Total archive length in bytes
		length: u64,
	},

	/// Entry offset or size does not fit into 32 bits
	#[error("Archive too large: entry '{path}' reaches byte {offset}")]
	ArchiveTooLarge {
		/// Path of the entry that overflowed
		path: String,
		/// First byte position that does not fit
		offset: u64,
	},

	/// Path contains characters outside the archive code page
	#[error("Path '{path}' cannot be encoded in {encoding}")]
	Encoding {
		/// Offending path
		path: String,
		/// Name of the code page
		encoding: &'static str,
	},

	/// Entry path would escape the extraction directory
	#[error("Refusing to extract unsafe path '{0}'")]
	UnsafePath(String),

	/// Directory walk failed while packing
	#[error("Failed to walk '{path}': {message}")]
	Walk {
		/// Path being walked
		path: PathBuf,
		/// Underlying error message
		message: String,
	},

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

/// Errors that can occur when encoding or decoding FNT glyph containers
#[derive(Debug, Error)]
pub enum FntError {
	/// Not enough data for the fixed header
	#[error("Insufficient data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Pointer table runs past the end of the file
	#[error("Truncated file: pointer table needs {expected} bytes, file has {actual} bytes")]
	TruncatedFile {
		/// Bytes required for header and pointer table
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Glyph pointer cannot address a width field inside the file
	#[error("Glyph {glyph}: pointer {pointer:#010X} is out of range (file length {length})")]
	InvalidPointer {
		/// Glyph index
		glyph: usize,
		/// Offending pointer
		pointer: u32,
		/// File length in bytes
		length: usize,
	},

	/// Glyph dimensions are beyond what a bitmap font can hold
	#[error("Glyph {glyph}: dimensions {width}x{height} are too large")]
	GlyphTooLarge {
		/// Glyph index
		glyph: usize,
		/// Width read from the payload
		width: u32,
		/// Font height
		height: u32,
	},

	/// Encoded font does not fit the 32-bit pointer table
	#[error("Font too large: {size} bytes exceeds the 32-bit pointer range")]
	FontTooLarge {
		/// Size the font would have had
		size: u64,
	},

	/// No image files were found to encode
	#[error("No BMP files found in '{0}'")]
	NoGlyphImages(PathBuf),

	/// Every candidate image is either marked empty or a 1x1 placeholder
	#[error("Could not determine font height")]
	NoHeightDetermined,

	/// An input image could not be loaded or converted
	#[error("Error processing image '{file}': {source}")]
	ImageProcessing {
		/// Offending file name
		file: String,
		/// Underlying image error
		#[source]
		source: image::ImageError,
	},

	/// Image codec error outside of the encoder input path
	#[error(transparent)]
	Image(#[from] image::ImageError),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}
