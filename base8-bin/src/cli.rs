//! Specifies the CLI and handles arg parsing

use base8::{DEFAULT_BLUR_RADIUS, DEFAULT_GRID};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Supported output formats for the final colors
#[derive(Copy, Clone, ValueEnum)]
pub enum FormatOutput {
	/// sRGB hexcode
	Hex,
	/// sRGB (r,g,b) triple
	Rgb,
	/// Whitespace with true color background
	Swatch,
}

/// Ways to colorize the output text
#[derive(Copy, Clone, ValueEnum)]
pub enum ColorizeOutput {
	/// Foreground
	Fg,
	/// Background
	Bg,
}

/// Which of the two palettes to print
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OnlyOutput {
	/// The 8-step tonal ramp
	Base8,
	/// The prominent colors
	Palette,
}

/// Print an 8-step tonal ramp ("base8") and the prominent colors of an image.
///
/// The ramp starts at the darkest pixel of the image and lightens each channel by 32 per step.
/// The prominent colors are the most frequent color of each tile of a blurred copy of the image,
/// sorted descending by (red, green, blue).
#[derive(Parser)]
#[command(version)]
pub struct Options {
	/// The path to the input image (.jpg, .jpeg, or .png)
	pub image: PathBuf,

	/// The format to print the colors in
	#[arg(short, long, default_value = "hex")]
	pub output: FormatOutput,

	/// Color the foreground or background for each printed color
	#[arg(short, long)]
	pub colorize: Option<ColorizeOutput>,

	/// Only print one of the palettes
	///
	/// By default, the prominent colors are printed on the first line and the tonal ramp on the second.
	#[arg(long)]
	pub only: Option<OnlyOutput>,

	/// The number of tiles along each dimension of the image
	///
	/// Each tile contributes one prominent color, so up to grid * grid colors are printed.
	/// If a dimension of the image is not divisible by the grid, the leftover strip is not sampled
	/// and fewer colors may be printed.
	#[arg(short, long, default_value_t = DEFAULT_GRID)]
	pub grid: u32,

	/// The radius of the stack blur applied before finding the prominent colors
	///
	/// Blurring prevents the most frequent color of a tile from being decided by noise,
	/// like anti-aliased edges or compression artifacts. A radius of 0 disables blurring.
	#[arg(short, long, default_value_t = DEFAULT_BLUR_RADIUS)]
	pub blur_radius: u32,

	/// The maximum image size, in number of pixels, before a thumbnail is created
	///
	/// This option is intended for reducing the time needed for large images,
	/// but note that the thumbnail interpolates pixels, which changes the exact colors that are counted.
	#[arg(short = 'p', long, default_value_t = u32::MAX)]
	pub max_pixels: u32,

	/// Save the blurred image to this path as a png
	#[arg(long)]
	pub save_blurred: Option<PathBuf>,

	/// The number of threads to use
	///
	/// This has no effect if base8 was built without the "threads" feature.
	#[arg(short, long, default_value_t = 1)]
	pub threads: u8,

	/// Print additional information, such as the running time of each step
	#[arg(long)]
	pub verbose: bool,
}
