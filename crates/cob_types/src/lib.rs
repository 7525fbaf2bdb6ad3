//! This crate provides core data types and file format support for the `cob-rs` project.
//!
//! # File Formats
//!
//! - **COB**: Flat archives of Windows-1251 named files behind a path table and an offset table
//! - **FNT**: Bitmap fonts with a fixed glyph height and per-glyph widths
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use cob_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Work with archives
//! let index = CobIndex::open("DATA.COB")?;
//! println!("{index}");
//!
//! // Work with fonts
//! let decoded = file::fnt::decode_file("FONT.FNT")?;
//! println!("{}", decoded.header);
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use cob_types::file::cob::Builder;
//!
//! let mut builder = Builder::new();
//! builder.add("DATA/README.TXT", b"hello".to_vec());
//! // ...
//! ```

pub mod file;

/// `use cob_types::prelude::*;` to import commonly used items.
pub mod prelude;
