//! `.COB` archive format support.
//!
//! A COB archive stores a flat list of files behind two fixed-width tables.
//! Payload sizes are not stored; each one is the distance from an entry's
//! offset to the next entry's offset, and the last entry runs to the end of
//! the archive.
//!
//! # File Structure
//!
//! ```text
//! [0..4)                          entry count (i32, <= 0 means empty)
//! [4 .. 4+50*N)                   path records, Windows-1251, `\` separated, NUL padded
//! [4+50*N .. 4+54*N)              payload offsets (u32)
//! [4+54*N .. EOF)                 payloads, concatenated in entry order
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use cob_types::file::cob::{self, Index};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = cob::pack_dir("assets/")?;
//! std::fs::write("DATA.COB", &bytes)?;
//!
//! let index = Index::open("DATA.COB")?;
//! for row in index.list() {
//!     println!("{:3}: {:10} {}", row.index + 1, row.size, row.path);
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod entry;
mod index;

use std::{fs, path::Path};

pub use builder::Builder;
pub use entry::{Entry, Listing, decode_path_record, encode_path_record};
pub use index::{Index, Issue};

use crate::file::error::CobError;

/// COB archive constants.
pub mod constants {
	/// Size of the entry count header in bytes
	pub const HEADER_SIZE: usize = 4;

	/// Size of one path record in bytes
	pub const PATH_RECORD_SIZE: usize = 50;

	/// Longest encoded path that still leaves room for the NUL terminator
	pub const MAX_PATH_BYTES: usize = PATH_RECORD_SIZE - 1;

	/// Size of one offset table entry in bytes
	pub const OFFSET_SIZE: usize = 4;

	/// Returns the offset of the first payload byte in an archive with `count` entries.
	pub const fn data_start(count: usize) -> u64 {
		HEADER_SIZE as u64 + count as u64 * (PATH_RECORD_SIZE + OFFSET_SIZE) as u64
	}
}

/// Packs every file below `dir` into archive bytes.
pub fn pack_dir(dir: impl AsRef<Path>) -> Result<Vec<u8>, CobError> {
	Builder::from_dir(dir)?.to_bytes()
}

/// Opens the archive at `archive` and extracts it below `dest`.
///
/// Returns the parsed index. The archive file is closed on every path out of
/// this function.
pub fn unpack(archive: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<Index, CobError> {
	let mut file = fs::File::open(archive)?;
	let index = Index::from_reader(&mut file)?;
	index.extract(&mut file, dest)?;
	Ok(index)
}
