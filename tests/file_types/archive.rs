//! Pack and unpack COB archives on disk

use std::{collections::BTreeMap, fs, path::Path};

use cob_rs::prelude::{CobBuilder, CobError, CobIndex, CobIssue, file::cob};
use log::info;
use tempfile::tempdir;
use walkdir::WalkDir;

/// Reads every file below `root` keyed by its `/`-separated relative path.
fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
	WalkDir::new(root)
		.into_iter()
		.map(Result::unwrap)
		.filter(|e| e.file_type().is_file())
		.map(|e| {
			let relative = e.path().strip_prefix(root).unwrap();
			let key = relative
				.components()
				.map(|c| c.as_os_str().to_string_lossy().into_owned())
				.collect::<Vec<_>>()
				.join("/");
			(key, fs::read(e.path()).unwrap())
		})
		.collect()
}

fn write(root: &Path, relative: &str, data: &[u8]) {
	let path = root.join(relative);
	fs::create_dir_all(path.parent().unwrap()).unwrap();
	fs::write(path, data).unwrap();
}

#[test_log::test]
fn test_round_trip_nested_tree() {
	let work = tempdir().unwrap();
	let input = work.path().join("input");
	write(&input, "readme.txt", b"hello");
	write(&input, "data/level1.bin", &[0, 1, 2, 255]);
	write(&input, "data/maps/empty.map", b"");
	write(&input, "тест/файл.txt", "привет".as_bytes());

	let archive = work.path().join("DATA.COB");
	let written = CobBuilder::from_dir(&input).unwrap().save(&archive).unwrap();
	assert_eq!(written, fs::metadata(&archive).unwrap().len());

	let index = CobIndex::open(&archive).unwrap();
	info!("{}", index);
	let paths: Vec<_> = index.entries().iter().map(|e| e.path()).collect();
	assert_eq!(paths, ["data/level1.bin", "data/maps/empty.map", "readme.txt", "тест/файл.txt"]);

	// on-disk records use backslashes
	let bytes = fs::read(&archive).unwrap();
	assert_eq!(&bytes[4..19], b"data\\level1.bin");

	let output = work.path().join("output");
	let unpacked = cob::unpack(&archive, &output).unwrap();
	assert_eq!(unpacked, index);
	assert_eq!(snapshot(&output), snapshot(&input));
}

#[test_log::test]
fn test_offsets_and_sizes() {
	let work = tempdir().unwrap();
	write(work.path(), "a.bin", &[1; 10]);
	write(work.path(), "b.bin", &[]);
	write(work.path(), "c.bin", &[3; 7]);

	let bytes = cob::pack_dir(work.path()).unwrap();
	let index = CobIndex::from_bytes(&bytes).unwrap();

	let offsets: Vec<_> = index.entries().iter().map(|e| e.offset()).collect();
	assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
	assert_eq!(offsets[0] as u64, cob::constants::data_start(3));

	let sizes: Vec<_> = index.entries().iter().map(|e| e.size()).collect();
	assert_eq!(sizes, [10, 0, 7]);

	let last = index.entries().last().unwrap();
	assert_eq!(u64::from(last.size()), bytes.len() as u64 - u64::from(last.offset()));
	assert!(index.verify().is_empty());
}

#[test_log::test]
fn test_empty_directory() {
	let work = tempdir().unwrap();
	let input = work.path().join("input");
	fs::create_dir(&input).unwrap();

	let archive = work.path().join("EMPTY.COB");
	CobBuilder::from_dir(&input).unwrap().save(&archive).unwrap();
	assert_eq!(fs::read(&archive).unwrap(), [0, 0, 0, 0]);

	let output = work.path().join("output");
	let index = cob::unpack(&archive, &output).unwrap();
	assert!(index.is_empty());
	assert!(!output.exists());
}

#[test_log::test]
fn test_negative_count_is_empty() {
	let work = tempdir().unwrap();
	let archive = work.path().join("NEG.COB");
	fs::write(&archive, (-1i32).to_le_bytes()).unwrap();

	let index = cob::unpack(&archive, work.path().join("output")).unwrap();
	assert!(index.is_empty());
}

#[test_log::test]
fn test_long_path_is_truncated() {
	let work = tempdir().unwrap();
	let input = work.path().join("input");
	let long_name = format!("{}.txt", "a".repeat(60));
	write(&input, &long_name, b"long");

	let bytes = cob::pack_dir(&input).unwrap();
	let index = CobIndex::from_bytes(&bytes).unwrap();
	let path = index.entries()[0].path();
	assert_eq!(path.len(), 49);
	assert_eq!(path, &long_name[..49]);

	let output = work.path().join("output");
	let archive = work.path().join("LONG.COB");
	fs::write(&archive, &bytes).unwrap();
	cob::unpack(&archive, &output).unwrap();
	assert_eq!(fs::read(output.join(&long_name[..49])).unwrap(), b"long");
}

#[test_log::test]
fn test_unencodable_path_writes_nothing() {
	let work = tempdir().unwrap();
	let mut builder = CobBuilder::new();
	builder.add("ok.txt", b"ok".to_vec());
	builder.add("日本.txt", b"ng".to_vec());

	let archive = work.path().join("BAD.COB");
	let result = builder.save(&archive);
	assert!(matches!(result, Err(CobError::Encoding { .. })));
	assert!(!archive.exists());
}

#[test_log::test]
fn test_unsafe_path_is_refused() {
	let work = tempdir().unwrap();
	let mut builder = CobBuilder::new();
	builder.add("../escape.txt", b"nope".to_vec());

	let archive = work.path().join("EVIL.COB");
	builder.save(&archive).unwrap();

	let index = CobIndex::open(&archive).unwrap();
	assert!(matches!(index.verify().as_slice(), [CobIssue::UnsafePath { index: 0, .. }]));

	let output = work.path().join("nested").join("output");
	let result = cob::unpack(&archive, &output);
	assert!(matches!(result, Err(CobError::UnsafePath(_))));
	assert!(!work.path().join("nested").join("escape.txt").exists());
}

#[test_log::test]
fn test_corrupt_offsets_are_rejected() {
	let mut builder = CobBuilder::new();
	builder.add("a", b"aa".to_vec()).add("b", b"bb".to_vec());
	let mut bytes = builder.to_bytes().unwrap();

	// swap the two offsets
	let table = 4 + 2 * 50;
	let (first, second) = bytes[table..table + 8].split_at_mut(4);
	first.swap_with_slice(second);

	let result = CobIndex::from_bytes(&bytes);
	assert!(matches!(result, Err(CobError::InvalidOffset { index: 1, .. })));
}

#[test_log::test]
fn test_failed_extract_keeps_earlier_files() {
	let work = tempdir().unwrap();
	let mut builder = CobBuilder::new();
	builder.add("a.txt", b"abc".to_vec()).add("../x", b"nope".to_vec());

	let archive = work.path().join("HALF.COB");
	builder.save(&archive).unwrap();

	let output = work.path().join("output");
	let result = cob::unpack(&archive, &output);
	assert!(matches!(result, Err(CobError::UnsafePath(ref path)) if path == "../x"));
	assert_eq!(fs::read(output.join("a.txt")).unwrap(), b"abc");
	assert!(!work.path().join("x").exists());
}

#[test_log::test]
fn test_file_directory_clash_keeps_earlier_files() {
	let work = tempdir().unwrap();
	let mut builder = CobBuilder::new();
	builder.add("a", b"first".to_vec()).add("a/b", b"second".to_vec());

	let archive = work.path().join("CLASH.COB");
	builder.save(&archive).unwrap();

	let output = work.path().join("output");
	let result = cob::unpack(&archive, &output);
	assert!(matches!(result, Err(CobError::IOError(_))));
	assert_eq!(fs::read(output.join("a")).unwrap(), b"first");
}
