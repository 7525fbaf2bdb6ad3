//! COB archive CLI Utility
//!
//! A command-line tool for inspecting, extracting, and packing `.COB` archives.
//!
//! # Features
//!
//! - **list**: Dry-run listing of every entry (index, size, path)
//! - **extract**: Extract all entries below a directory
//! - **pack**: Pack a directory tree into an archive
//! - **verify**: Check offsets, duplicate paths and unsafe paths
//!
//! # File Format
//!
//! A COB archive starts with an entry count, followed by one 50-byte path
//! record per entry (Windows-1251, `\` separated), one offset per entry and
//! the concatenated payloads. Sizes are derived from neighbouring offsets.
//!
//! # Usage Examples
//!
//! ```bash
//! # List entries
//! cargo run --example cob_utils -- list DATA.COB
//!
//! # List entries as JSON
//! cargo run --example cob_utils -- list DATA.COB --format json
//!
//! # Extract everything
//! cargo run --example cob_utils -- extract DATA.COB -o output/
//!
//! # Pack a directory
//! cargo run --example cob_utils -- pack input/ -o DATA.COB
//!
//! # Verify an archive
//! cargo run --example cob_utils -- verify DATA.COB
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use cob_rs::prelude::file::cob;
use cob_rs::prelude::{CobBuilder, CobIndex, CobListing};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cob_utils")]
#[command(author = "cob-rs project")]
#[command(version = "1.0")]
#[command(about = "COB archive utility - list, extract, pack, and verify", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// List all entries in the archive
	List {
		/// Input archive path
		#[arg(value_name = "ARCHIVE")]
		input: PathBuf,

		/// Output format
		#[arg(short, long, value_enum, default_value = "table")]
		format: OutputFormat,

		/// Filter by path pattern (case-insensitive)
		#[arg(short = 'p', long, value_name = "PATTERN")]
		filter: Option<String>,
	},

	/// Extract all entries; lists them instead when no output directory is given
	Extract {
		/// Input archive path
		#[arg(value_name = "ARCHIVE")]
		input: PathBuf,

		/// Output directory
		#[arg(short, long, value_name = "OUTPUT_DIR", env = "COB_OUTPUT_DIR")]
		output: Option<PathBuf>,
	},

	/// Pack a directory into an archive
	Pack {
		/// Input directory
		#[arg(value_name = "INPUT_DIR")]
		input: PathBuf,

		/// Output archive path
		#[arg(short, long, value_name = "ARCHIVE")]
		output: PathBuf,

		/// Show the packed entries
		#[arg(short, long)]
		verbose: bool,
	},

	/// Verify archive integrity
	Verify {
		/// Input archive path
		#[arg(value_name = "ARCHIVE")]
		input: PathBuf,

		/// Also read every payload back
		#[arg(short, long)]
		strict: bool,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
	/// Table format
	Table,
	/// JSON format
	Json,
	/// CSV format
	Csv,
}

fn open_index(input: &Path) -> Result<CobIndex, String> {
	CobIndex::open(input).map_err(|e| format!("Failed to open archive '{}': {}", input.display(), e))
}

fn print_listing(rows: &[CobListing], format: OutputFormat) -> Result<(), String> {
	match format {
		OutputFormat::Table => {
			for row in rows {
				println!("{:3}:  {:10}  {}", row.index + 1, row.size, row.path);
			}
			println!("\nTotal: {} files", rows.len());
		}
		OutputFormat::Json => {
			let json = serde_json::to_string_pretty(&listing_json(rows))
				.map_err(|e| format!("Failed to serialize listing: {}", e))?;
			println!("{}", json);
		}
		OutputFormat::Csv => {
			println!("index,size,path");
			for row in rows {
				println!("{},{},\"{}\"", row.index + 1, row.size, row.path.replace('"', "\"\""));
			}
		}
	}

	Ok(())
}

/// Builds the JSON listing, numbered from 1 like the table and CSV output.
fn listing_json(rows: &[CobListing]) -> Vec<serde_json::Value> {
	rows.iter()
		.map(|row| {
			serde_json::json!({
				"index": row.index + 1,
				"size": row.size,
				"path": row.path,
			})
		})
		.collect()
}

/// Handles the 'list' command
fn handle_list(input: &Path, format: OutputFormat, filter: Option<String>) -> Result<(), String> {
	let index = open_index(input)?;

	let mut rows: Vec<_> = index.list().collect();
	if let Some(pattern) = filter {
		let pattern = pattern.to_lowercase();
		rows.retain(|row| row.path.to_lowercase().contains(&pattern));
	}

	print_listing(&rows, format)
}

/// Handles the 'extract' command
fn handle_extract(input: &Path, output: Option<PathBuf>) -> Result<(), String> {
	let Some(output) = output else {
		return handle_list(input, OutputFormat::Table, None);
	};

	let index = cob::unpack(input, &output)
		.map_err(|e| format!("Failed to extract '{}': {}", input.display(), e))?;

	println!("✓ Extracted {} files to {}", index.len(), output.display());
	Ok(())
}

/// Handles the 'pack' command
fn handle_pack(input: &Path, output: &Path, verbose: bool) -> Result<(), String> {
	if !input.is_dir() {
		return Err(format!("Input must be a directory: {}", input.display()));
	}

	let builder =
		CobBuilder::from_dir(input).map_err(|e| format!("Failed to collect files: {}", e))?;

	if verbose {
		for (idx, path) in builder.paths().enumerate() {
			println!("{:3}:  {}", idx + 1, path);
		}
	}

	if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent)
			.map_err(|e| format!("Failed to create output directory: {}", e))?;
	}

	let size = builder
		.save(output)
		.map_err(|e| format!("Failed to write '{}': {}", output.display(), e))?;

	println!("✓ Packed {} files ({} bytes) into {}", builder.len(), size, output.display());
	Ok(())
}

/// Handles the 'verify' command
fn handle_verify(input: &Path, strict: bool) -> Result<(), String> {
	let index = open_index(input)?;
	println!("{}", index);

	let mut errors: Vec<String> = index.verify().iter().map(ToString::to_string).collect();

	if strict {
		let mut file =
			fs::File::open(input).map_err(|e| format!("Failed to open '{}': {}", input.display(), e))?;
		for entry in &index {
			if let Err(e) = entry.read_from(&mut file) {
				errors.push(format!("{}: {}", entry.path(), e));
			}
		}
	}

	if !errors.is_empty() {
		println!("\n✗ Found {} problem(s):", errors.len());
		for error in &errors {
			println!("  {}", error);
		}
		return Err(format!("Verification failed with {} error(s)", errors.len()));
	}

	println!("\n✓ Verification passed");
	Ok(())
}

fn main() {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();

	let result = match cli.command {
		Commands::List {
			input,
			format,
			filter,
		} => handle_list(&input, format, filter),
		Commands::Extract {
			input,
			output,
		} => handle_extract(&input, output),
		Commands::Pack {
			input,
			output,
			verbose,
		} => handle_pack(&input, &output, verbose),
		Commands::Verify {
			input,
			strict,
		} => handle_verify(&input, strict),
	};

	if let Err(e) = result {
		eprintln!("Error: {}", e);
		std::process::exit(1);
	}
}
