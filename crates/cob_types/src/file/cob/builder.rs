//! Archive packing.

use std::{
	fs,
	io::{self, BufWriter, Read, Write},
	path::{Path, PathBuf},
};

use log::{debug, info};
use walkdir::WalkDir;

use super::{
	constants::{PATH_RECORD_SIZE, data_start},
	entry::encode_path_record,
};
use crate::file::error::CobError;

/// Where a pending entry's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
	Memory(Vec<u8>),
	File {
		path: PathBuf,
		size: u64,
	},
}

impl Source {
	fn size(&self) -> u64 {
		match self {
			Self::Memory(data) => data.len() as u64,
			Self::File {
				size,
				..
			} => *size,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingEntry {
	path: String,
	source: Source,
}

/// Builds a COB archive.
///
/// Entries are written in exactly the order they were added; the path table,
/// the offset table and the payload blob all follow that order.
/// [`Builder::from_dir`] fixes the order by sorting relative paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Builder {
	entries: Vec<PendingEntry>,
}

impl Builder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Collects every regular file below `dir`.
	///
	/// Symbolic links to files are packed with the target's contents; linked
	/// directories are not descended into. Entries are ordered by their
	/// `/`-separated relative path, compared byte by byte, so the same tree
	/// always packs to the same archive.
	pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, CobError> {
		let dir = dir.as_ref();
		let walk_error = |message: String| CobError::Walk {
			path: dir.to_path_buf(),
			message,
		};

		let mut files = Vec::new();
		for item in WalkDir::new(dir).follow_links(false) {
			let item = item.map_err(|e| walk_error(e.to_string()))?;
			let metadata = if item.file_type().is_symlink() {
				// follows the link
				item.path().metadata().map_err(|e| walk_error(format!("{}: {}", item.path().display(), e)))?
			} else {
				item.metadata().map_err(|e| walk_error(e.to_string()))?
			};
			if !metadata.is_file() {
				continue;
			}

			let relative = item.path().strip_prefix(dir).map_err(|e| walk_error(e.to_string()))?;
			let path = relative
				.components()
				.map(|c| c.as_os_str().to_string_lossy())
				.collect::<Vec<_>>()
				.join("/");
			files.push(PendingEntry {
				path,
				source: Source::File {
					path: item.path().to_path_buf(),
					size: metadata.len(),
				},
			});
		}

		files.sort_by(|a, b| a.path.as_bytes().cmp(b.path.as_bytes()));
		debug!("Collected {} files from {}", files.len(), dir.display());

		Ok(Self {
			entries: files,
		})
	}

	/// Appends an in-memory entry.
	pub fn add(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> &mut Self {
		self.entries.push(PendingEntry {
			path: path.into().replace('\\', "/"),
			source: Source::Memory(data.into()),
		});
		self
	}

	/// Appends an entry whose bytes are read from `file` while writing.
	pub fn add_file(&mut self, path: impl Into<String>, file: impl AsRef<Path>) -> Result<&mut Self, CobError> {
		let file = file.as_ref();
		let size = fs::metadata(file)?.len();
		self.entries.push(PendingEntry {
			path: path.into().replace('\\', "/"),
			source: Source::File {
				path: file.to_path_buf(),
				size,
			},
		});
		Ok(self)
	}

	/// Returns the number of pending entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if nothing has been added.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns the pending paths in write order.
	pub fn paths(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|e| e.path.as_str())
	}

	/// Encodes the path table and computes the offset table.
	///
	/// Nothing is written if any path fails to encode, an offset does not fit
	/// 32 bits, or an entry is too large for its size to be derived on read.
	fn layout(&self) -> Result<(Vec<[u8; PATH_RECORD_SIZE]>, Vec<u32>), CobError> {
		if i32::try_from(self.entries.len()).is_err() {
			return Err(CobError::ArchiveTooLarge {
				path: String::new(),
				offset: data_start(self.entries.len()),
			});
		}

		let records = self
			.entries
			.iter()
			.map(|e| encode_path_record(&e.path))
			.collect::<Result<Vec<_>, _>>()?;

		let mut offsets = Vec::with_capacity(self.entries.len());
		let mut current = data_start(self.entries.len());
		for entry in &self.entries {
			let offset = u32::try_from(current).map_err(|_| CobError::ArchiveTooLarge {
				path: entry.path.clone(),
				offset: current,
			})?;
			offsets.push(offset);

			let size = entry.source.size();
			if u32::try_from(size).is_err() {
				return Err(CobError::ArchiveTooLarge {
					path: entry.path.clone(),
					offset: current + size,
				});
			}
			current += size;
		}

		Ok((records, offsets))
	}

	/// Writes the archive to `writer`, returning the number of bytes written.
	pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<u64, CobError> {
		let (records, offsets) = self.layout()?;

		writer.write_all(&(self.entries.len() as u32).to_le_bytes())?;
		for record in &records {
			writer.write_all(record)?;
		}
		for offset in &offsets {
			writer.write_all(&offset.to_le_bytes())?;
		}

		let mut written = data_start(self.entries.len());
		for entry in &self.entries {
			let copied = match &entry.source {
				Source::Memory(data) => {
					writer.write_all(data)?;
					data.len() as u64
				}
				Source::File {
					path,
					size,
				} => {
					let file = fs::File::open(path)?;
					let copied = io::copy(&mut file.take(*size), writer)?;
					if copied != *size {
						return Err(io::Error::new(
							io::ErrorKind::UnexpectedEof,
							format!("'{}' shrank from {} to {} bytes while packing", path.display(), size, copied),
						)
						.into());
					}
					copied
				}
			};
			debug!("Packed {} ({} bytes)", entry.path, copied);
			written += copied;
		}

		Ok(written)
	}

	/// Serializes the archive to bytes.
	pub fn to_bytes(&self) -> Result<Vec<u8>, CobError> {
		self.layout()?;
		let total = self.entries.iter().fold(data_start(self.entries.len()), |acc, e| acc + e.source.size());
		let mut buffer = Vec::with_capacity(total as usize);
		self.write_to(&mut buffer)?;
		Ok(buffer)
	}

	/// Writes the archive to a file at `path`.
	///
	/// The file is not created if the table layout fails.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<u64, CobError> {
		let path = path.as_ref();
		self.layout()?;
		let mut writer = BufWriter::new(fs::File::create(path)?);
		let written = self.write_to(&mut writer)?;
		writer.flush()?;

		info!("Packed {} files into {}", self.entries.len(), path.display());
		Ok(written)
	}
}
