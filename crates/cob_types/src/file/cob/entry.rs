//! Archive entries and the fixed-width path records that name them.

use std::{
	fmt::Formatter,
	io::{self, Read, Seek, SeekFrom},
	path::PathBuf,
};

use encoding_rs::WINDOWS_1251;
use log::warn;

use super::constants::{MAX_PATH_BYTES, PATH_RECORD_SIZE};
use crate::file::error::CobError;

/// A single file stored in a COB archive.
///
/// The size is never stored on disk. It is derived once, when the index is
/// parsed, from the distance to the next entry's offset (or to the end of the
/// archive for the last entry).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
	/// Path with `/` separators
	path: String,

	/// Byte offset of the payload from the start of the archive
	offset: u32,

	/// Payload length in bytes
	size: u32,
}

impl Entry {
	pub(super) fn new(path: String, offset: u32, size: u32) -> Self {
		Self {
			path,
			offset,
			size,
		}
	}

	/// Returns the relative path with `/` separators.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the path as stored on disk, with `\` separators.
	pub fn raw_path(&self) -> String {
		self.path.replace('/', "\\")
	}

	/// Returns the directory part of the path, empty for top-level files.
	pub fn dir(&self) -> &str {
		self.path.rsplit_once('/').map_or("", |(dir, _)| dir)
	}

	/// Returns the file name part of the path.
	pub fn name(&self) -> &str {
		self.path.rsplit_once('/').map_or(self.path.as_str(), |(_, name)| name)
	}

	/// Returns the payload offset.
	pub fn offset(&self) -> u32 {
		self.offset
	}

	/// Returns the payload size.
	pub fn size(&self) -> u32 {
		self.size
	}

	/// Returns the offset one past the last payload byte.
	pub fn end(&self) -> u64 {
		u64::from(self.offset) + u64::from(self.size)
	}

	/// Reads this entry's payload from an archive source.
	pub fn read_from<R: Read + Seek>(&self, reader: &mut R) -> Result<Vec<u8>, CobError> {
		reader.seek(SeekFrom::Start(u64::from(self.offset)))?;

		let mut data = Vec::with_capacity(self.size as usize);
		reader.by_ref().take(u64::from(self.size)).read_to_end(&mut data)?;
		if data.len() != self.size as usize {
			return Err(io::Error::new(
				io::ErrorKind::UnexpectedEof,
				format!(
					"'{}': expected {} bytes at {:#X}, got {}",
					self.path,
					self.size,
					self.offset,
					data.len()
				),
			)
			.into());
		}

		Ok(data)
	}

	/// Converts the entry path to a relative filesystem path.
	///
	/// Rejects rooted paths, drive prefixes and `..` components so that an
	/// extraction can never write outside its destination directory.
	pub fn relative_path(&self) -> Result<PathBuf, CobError> {
		if self.path.starts_with('/') {
			return Err(CobError::UnsafePath(self.path.clone()));
		}

		let mut relative = PathBuf::new();
		for (i, component) in self.path.split('/').enumerate() {
			match component {
				"" | "." => {}
				".." => return Err(CobError::UnsafePath(self.path.clone())),
				c if i == 0 && c.ends_with(':') => {
					return Err(CobError::UnsafePath(self.path.clone()));
				}
				c => relative.push(c),
			}
		}

		if self.name().is_empty() || relative.as_os_str().is_empty() {
			return Err(CobError::UnsafePath(self.path.clone()));
		}

		Ok(relative)
	}
}

impl std::fmt::Display for Entry {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Entry {{ path: '{}', offset: {:#X}, size: {} }}", self.path, self.offset, self.size)
	}
}

/// A row of the dry-run listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
	/// Zero-based position in the archive
	pub index: usize,

	/// Payload size in bytes
	pub size: u32,

	/// Relative path with `/` separators
	pub path: String,
}

/// Decodes a 50-byte path record.
///
/// The record ends at the first NUL byte. Backslashes are normalized to `/`.
pub fn decode_path_record(record: &[u8]) -> String {
	let end = record.iter().position(|&b| b == 0).unwrap_or(record.len());
	let (path, _) = WINDOWS_1251.decode_without_bom_handling(&record[..end]);
	path.replace('\\', "/")
}

/// Encodes a path into a 50-byte path record.
///
/// Separators become `\`. Encoded paths longer than 49 bytes are cut at 49
/// bytes so the record always keeps its terminating NUL. Two long paths sharing
/// a 49-byte prefix end up with the same record.
pub fn encode_path_record(path: &str) -> Result<[u8; PATH_RECORD_SIZE], CobError> {
	let raw = path.replace('/', "\\");
	let (bytes, _, had_errors) = WINDOWS_1251.encode(&raw);
	if had_errors {
		return Err(CobError::Encoding {
			path: path.to_string(),
			encoding: WINDOWS_1251.name(),
		});
	}

	let len = bytes.len().min(MAX_PATH_BYTES);
	if bytes.len() > MAX_PATH_BYTES {
		warn!(
			"Path '{}' is {} bytes long, truncating to {} bytes",
			path,
			bytes.len(),
			MAX_PATH_BYTES
		);
	}

	let mut record = [0u8; PATH_RECORD_SIZE];
	record[..len].copy_from_slice(&bytes[..len]);
	Ok(record)
}
