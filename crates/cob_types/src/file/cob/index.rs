//! Parsed archive index: path table plus offset table.

use std::{
	collections::HashSet,
	fmt::Formatter,
	fs,
	io::{self, Cursor, Read, Seek, SeekFrom},
	path::Path,
};

use log::{debug, info};

use super::{
	constants::{HEADER_SIZE, OFFSET_SIZE, PATH_RECORD_SIZE, data_start},
	entry::{Entry, Listing, decode_path_record},
};
use crate::file::error::CobError;

/// Problems reported by [`Index::verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
	/// Entry payload starts inside the header or tables
	OverlapsTables {
		/// Entry index
		index: usize,
		/// Entry offset
		offset: u32,
		/// First byte after the tables
		data_start: u64,
	},

	/// Two entries share the same path, usually after truncation
	DuplicatePath {
		/// Index of the later entry
		index: usize,
		/// Shared path
		path: String,
	},

	/// Entry path cannot be extracted safely
	UnsafePath {
		/// Entry index
		index: usize,
		/// Offending path
		path: String,
	},
}

impl std::fmt::Display for Issue {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::OverlapsTables {
				index,
				offset,
				data_start,
			} => write!(
				f,
				"Entry {}: offset {:#X} lies inside the tables (data starts at {:#X})",
				index, offset, data_start
			),
			Self::DuplicatePath {
				index,
				path,
			} => write!(f, "Entry {}: duplicate path '{}'", index, path),
			Self::UnsafePath {
				index,
				path,
			} => write!(f, "Entry {}: unsafe path '{}'", index, path),
		}
	}
}

/// Index of a COB archive.
///
/// Holds every entry in on-disk order together with the total archive length
/// that the last entry's size was derived from. The index does not keep the
/// byte source open; reads take the source explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Index {
	entries: Vec<Entry>,
	length: u64,
}

impl Index {
	/// Creates an index with no entries.
	pub fn empty() -> Self {
		Self {
			entries: Vec::new(),
			length: HEADER_SIZE as u64,
		}
	}

	/// Opens an archive file and parses its index.
	///
	/// The file handle is closed before this returns.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, CobError> {
		let mut file = fs::File::open(path)?;
		Self::from_reader(&mut file)
	}

	/// Parses an index from an in-memory archive.
	pub fn from_bytes(data: &[u8]) -> Result<Self, CobError> {
		Self::from_reader(&mut Cursor::new(data))
	}

	/// Parses an index from any seekable source.
	///
	/// A non-positive entry count yields an empty index. Offsets must be
	/// non-decreasing and must not point past the end of the source.
	pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self, CobError> {
		let length = reader.seek(SeekFrom::End(0))?;
		reader.seek(SeekFrom::Start(0))?;

		if length < HEADER_SIZE as u64 {
			return Err(CobError::InsufficientData {
				expected: HEADER_SIZE,
				actual: length as usize,
			});
		}

		let mut buf = [0u8; HEADER_SIZE];
		reader.read_exact(&mut buf)?;
		let count = i32::from_le_bytes(buf);
		if count < 1 {
			debug!("Archive header declares {} entries, treating as empty", count);
			return Ok(Self {
				entries: Vec::new(),
				length,
			});
		}

		let count = count as usize;
		let required = data_start(count);
		if length < required {
			return Err(CobError::InsufficientData {
				expected: required as usize,
				actual: length as usize,
			});
		}

		let mut records = vec![0u8; count * PATH_RECORD_SIZE];
		reader.read_exact(&mut records)?;
		let mut table = vec![0u8; count * OFFSET_SIZE];
		reader.read_exact(&mut table)?;

		let paths = records.chunks_exact(PATH_RECORD_SIZE).map(decode_path_record);
		let offsets: Vec<u32> = table
			.chunks_exact(OFFSET_SIZE)
			.map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
			.collect();

		Self::from_parts(paths, &offsets, length)
	}

	fn from_parts(
		paths: impl Iterator<Item = String>,
		offsets: &[u32],
		length: u64,
	) -> Result<Self, CobError> {
		let mut previous = 0u32;
		for (index, &offset) in offsets.iter().enumerate() {
			if offset < previous || u64::from(offset) > length {
				return Err(CobError::InvalidOffset {
					index,
					offset,
					previous,
					length,
				});
			}
			previous = offset;
		}

		// Each entry ends where the next one starts; the last one ends at EOF.
		let ends = offsets.iter().skip(1).map(|&o| u64::from(o)).chain(std::iter::once(length));

		let mut entries = Vec::with_capacity(offsets.len());
		for (path, (&offset, end)) in paths.zip(offsets.iter().zip(ends)) {
			let size = u32::try_from(end - u64::from(offset)).map_err(|_| {
				CobError::ArchiveTooLarge {
					path: path.clone(),
					offset: end,
				}
			})?;
			entries.push(Entry::new(path, offset, size));
		}

		Ok(Self {
			entries,
			length,
		})
	}

	/// Returns the entries in archive order.
	pub fn entries(&self) -> &[Entry] {
		&self.entries
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if the archive holds no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns the total archive length the sizes were derived from.
	pub fn archive_len(&self) -> u64 {
		self.length
	}

	/// Finds an entry by path, comparing `/` and `\` separators alike.
	pub fn find(&self, path: &str) -> Option<&Entry> {
		let path = path.replace('\\', "/");
		self.entries.iter().find(|e| e.path() == path)
	}

	/// Lists `(index, size, path)` for every entry without touching the source.
	pub fn list(&self) -> impl Iterator<Item = Listing> + '_ {
		self.entries.iter().enumerate().map(|(index, entry)| Listing {
			index,
			size: entry.size(),
			path: entry.path().to_string(),
		})
	}

	/// Extracts every entry below `dest`, creating directories as needed.
	///
	/// Stops at the first failure. Files written before the failure are left
	/// in place. Returns the number of files written.
	pub fn extract<R: Read + Seek>(
		&self,
		reader: &mut R,
		dest: impl AsRef<Path>,
	) -> Result<usize, CobError> {
		let dest = dest.as_ref();
		if self.entries.is_empty() {
			info!("No files to extract");
			return Ok(0);
		}

		for entry in &self.entries {
			let output_path = dest.join(entry.relative_path()?);
			if let Some(parent) = output_path.parent() {
				fs::create_dir_all(parent)?;
			}

			reader.seek(SeekFrom::Start(u64::from(entry.offset())))?;
			let mut output = fs::File::create(&output_path)?;
			let copied = io::copy(&mut reader.by_ref().take(u64::from(entry.size())), &mut output)?;
			if copied != u64::from(entry.size()) {
				return Err(io::Error::new(
					io::ErrorKind::UnexpectedEof,
					format!("'{}': expected {} bytes, copied {}", entry.path(), entry.size(), copied),
				)
				.into());
			}

			info!("Extracted: {}", output_path.display());
		}

		Ok(self.entries.len())
	}

	/// Checks the index for problems that do not prevent parsing.
	pub fn verify(&self) -> Vec<Issue> {
		let mut issues = Vec::new();
		let start = data_start(self.entries.len());
		let mut seen = HashSet::new();

		for (index, entry) in self.entries.iter().enumerate() {
			if u64::from(entry.offset()) < start {
				issues.push(Issue::OverlapsTables {
					index,
					offset: entry.offset(),
					data_start: start,
				});
			}

			if !seen.insert(entry.path()) {
				issues.push(Issue::DuplicatePath {
					index,
					path: entry.path().to_string(),
				});
			}

			if entry.relative_path().is_err() {
				issues.push(Issue::UnsafePath {
					index,
					path: entry.path().to_string(),
				});
			}
		}

		issues
	}
}

impl Default for Index {
	fn default() -> Self {
		Self::empty()
	}
}

impl std::fmt::Display for Index {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "COB Archive: {} entries, {} bytes", self.entries.len(), self.length)?;
		for entry in &self.entries {
			writeln!(f, "  {}", entry)?;
		}
		Ok(())
	}
}

impl<'a> IntoIterator for &'a Index {
	type Item = &'a Entry;
	type IntoIter = std::slice::Iter<'a, Entry>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}

impl TryFrom<&[u8]> for Index {
	type Error = CobError;

	fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
		Self::from_bytes(value)
	}
}

impl TryFrom<&Vec<u8>> for Index {
	type Error = CobError;

	fn try_from(value: &Vec<u8>) -> Result<Self, Self::Error> {
		Self::from_bytes(value)
	}
}
