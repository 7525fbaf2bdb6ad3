//! FNT (Font) CLI Utility
//!
//! A command-line tool for inspecting, unpacking, and packing bitmap font files.
//!
//! # Features
//!
//! - **info**: Display header, pointer table and optional glyph previews
//! - **unpack**: Write every glyph as a BMP file
//! - **pack**: Build a font from a directory of BMP files
//!
//! # Font Format
//!
//! FNT files hold variable-width glyphs of a single height. Each glyph is a
//! width word followed by one byte per pixel; `0xFF` is background.
//! Glyph files named with `_empty` are packed as zero-width glyphs.
//!
//! # Usage Examples
//!
//! ```bash
//! # Display font information
//! cargo run --example fnt_utils -- info FONT.FNT
//!
//! # Preview the first 8 glyphs as ASCII art
//! cargo run --example fnt_utils -- info FONT.FNT --preview 8
//!
//! # Unpack glyphs, black on white
//! cargo run --example fnt_utils -- unpack FONT.FNT -o glyphs/ --invert
//!
//! # Pack glyphs into a font
//! cargo run --example fnt_utils -- pack glyphs/ -o FONT.FNT
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use cob_rs::prelude::{Palette, file::fnt};

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Info(opts) => run_info(opts),
		Command::Unpack(opts) => run_unpack(opts),
		Command::Pack(opts) => run_pack(opts),
	}
}

#[derive(Parser)]
#[command(name = "fnt_utils")]
#[command(author = "cob-rs project")]
#[command(version)]
#[command(about = "FNT font utility - inspect, unpack, and pack bitmap fonts", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Display font file information
	Info(InfoArgs),
	/// Write every glyph as a BMP file
	Unpack(UnpackArgs),
	/// Build a font from a directory of BMP files
	Pack(PackArgs),
}

#[derive(Args)]
struct InfoArgs {
	/// Input FNT file path
	#[arg(value_name = "INPUT_FNT")]
	input: PathBuf,

	/// Print the pointer table
	#[arg(short, long)]
	pointers: bool,

	/// Render the first N glyphs as ASCII art
	#[arg(long, value_name = "N", default_value_t = 0)]
	preview: usize,
}

#[derive(Args)]
struct UnpackArgs {
	/// Input FNT file path
	#[arg(value_name = "INPUT_FNT")]
	input: PathBuf,

	/// Output directory
	#[arg(short, long, value_name = "OUTPUT_DIR")]
	output: PathBuf,

	/// Render black glyphs on a white background
	#[arg(long)]
	invert: bool,
}

#[derive(Args)]
struct PackArgs {
	/// Directory of glyph BMP files
	#[arg(value_name = "INPUT_DIR")]
	input: PathBuf,

	/// Output FNT file path
	#[arg(short, long, value_name = "OUTPUT_FNT")]
	output: PathBuf,
}

fn run_info(args: InfoArgs) -> Result<()> {
	let decoded = fnt::decode_file(&args.input)
		.with_context(|| format!("Failed to load font file {}", args.input.display()))?;

	println!("\n=== Font Information ===");
	println!("File: {}", args.input.display());
	println!("Header: {}", decoded.header);
	if !decoded.header.has_valid_magic() {
		println!("Signature: unexpected");
	}
	println!("Glyphs decoded: {}", decoded.glyphs.len());
	println!("Empty glyphs: {}", decoded.glyphs.iter().filter(|g| g.is_empty()).count());
	println!("Size warnings: {}", decoded.warnings.len());
	println!("Skipped glyphs: {}", decoded.failures.len());

	if args.pointers {
		println!("\n=== Pointer Table ===");
		for (idx, pointer) in decoded.pointers.iter().enumerate() {
			println!("  [{:4}] {:#010X}", idx, pointer);
		}
	}

	for warning in &decoded.warnings {
		println!("  ⚠ {}", warning);
	}
	for failure in &decoded.failures {
		println!("  ✗ Glyph {}: {}", failure.glyph, failure.error);
	}

	if args.preview > 0 {
		println!("\n=== Sample Glyphs ===");
		for glyph in decoded.glyphs.iter().take(args.preview) {
			println!("\nGlyph {} ({} px wide):", glyph.index, glyph.width);
			print!("{}", glyph.raster.to_ascii_art('#', '.'));
		}
	}

	Ok(())
}

fn run_unpack(args: UnpackArgs) -> Result<()> {
	let data = fs::read(&args.input)
		.with_context(|| format!("Failed to read {}", args.input.display()))?;

	let palette = if args.invert {
		Palette::inverted()
	} else {
		Palette::default()
	};

	let decoded = fnt::decode_to_dir(&data, &args.output, palette)
		.with_context(|| format!("Failed to decode {}", args.input.display()))?;

	println!(
		"✓ Wrote {} of {} glyphs to {}",
		decoded.glyphs.len(),
		decoded.header.glyph_count,
		args.output.display()
	);

	if !decoded.is_complete() {
		let skipped: Vec<String> = decoded.skipped().map(|index| index.to_string()).collect();
		bail!("Skipped glyphs: {}", skipped.join(", "));
	}

	Ok(())
}

fn run_pack(args: PackArgs) -> Result<()> {
	if !args.input.is_dir() {
		bail!("{} is not a directory", args.input.display());
	}

	let (bytes, summary) = fnt::encode_dir(&args.input)
		.with_context(|| format!("Failed to encode {}", args.input.display()))?;

	create_parent(&args.output)?;
	fs::write(&args.output, &bytes)
		.with_context(|| format!("Failed to write {}", args.output.display()))?;

	println!("✓ Font saved: {}", args.output.display());
	println!("{}", summary);

	Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent)
			.with_context(|| format!("Failed to create {}", parent.display()))?;
	}
	Ok(())
}
