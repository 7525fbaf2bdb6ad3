//! Prelude module for `cob_types`.
//!
//! This module provides a convenient way to import commonly used types and constants.
//!
//! # Examples
//!
//! ```no_run
//! use cob_types::prelude::*;
//!
//! let builder = CobBuilder::new();
//! let palette = Palette::inverted();
//! ```

#[doc(inline)]
pub use crate::file::{
	// COB types
	CobBuilder,
	CobEntry,
	CobError,
	CobIndex,
	CobIssue,
	CobListing,

	// FNT types
	DecodedGlyph,
	FntDecoded,
	FntEncodeSummary,
	FntEncoder,
	FntError,
	FntHeader,
	Glyph,
	GlyphRaster,
	GlyphSource,
	Palette,
	Pixel,
};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
