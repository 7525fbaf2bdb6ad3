//! File type support for `cob-rs` project.

mod error;

pub mod cob;
pub mod fnt;

// Re-export error types
pub use error::{CobError, FntError};

// Re-export main file types
pub use cob::{
	Builder as CobBuilder, Entry as CobEntry, Index as CobIndex, Issue as CobIssue, Listing as CobListing,
};
pub use fnt::{
	Decoded as FntDecoded, DecodedGlyph, EncodeSummary as FntEncodeSummary, Encoder as FntEncoder, Glyph,
	GlyphRaster, GlyphSource, Header as FntHeader, Palette, Pixel,
};
