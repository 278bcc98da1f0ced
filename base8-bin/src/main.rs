//! Print an 8-step tonal ramp and the prominent colors of an image.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
	clippy::pedantic,
	clippy::cargo,
	clippy::use_debug,
	clippy::dbg_macro,
	clippy::todo,
	clippy::unimplemented,
	clippy::unwrap_used,
	clippy::unwrap_in_result,
	clippy::unneeded_field_pattern,
	clippy::rest_pat_in_fully_bound_structs,
	clippy::unnecessary_self_imports,
	clippy::str_to_string,
	clippy::string_to_string,
	clippy::string_slice,
	missing_docs,
	clippy::missing_docs_in_private_items,
	rustdoc::all,
	clippy::float_cmp_const,
	clippy::lossy_float_literal
)]
#![allow(
	clippy::doc_markdown,
	clippy::module_name_repetitions,
	clippy::missing_panics_doc,
	clippy::unreadable_literal
)]

mod cli;

#[allow(clippy::wildcard_imports)]
use cli::*;

use std::{
	fmt::{self, Display},
	path::{Path, PathBuf},
	process::ExitCode,
	time::Instant,
};

use base8::{color, histogram, order, Blur, Ramp, StackBlur};
use clap::Parser;
use colored::Colorize;
use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage};
use palette::Srgb;

/// Record the running time of a function and print the elapsed time
macro_rules! time {
	($name: literal, $verbose: expr, $func_call: expr) => {{
		let start = Instant::now();
		let result = $func_call;
		if $verbose {
			println!("{} took {}ms", $name, start.elapsed().as_millis());
		}
		result
	}};
}

/// The file extensions that can be decoded
const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Error cases for loading and decoding an image
#[derive(Debug)]
enum ImageLoadError {
	/// The path does not exist
	Missing(PathBuf),
	/// The file extension is not one of [`SUPPORTED_EXTENSIONS`]
	UnsupportedFormat(PathBuf),
	/// Failed to read or decode the image file
	ImageLoad(image::ImageError),
}

impl Display for ImageLoadError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			ImageLoadError::Missing(path) => write!(f, "{} does not exist", path.display()),
			ImageLoadError::UnsupportedFormat(path) => write!(
				f,
				"{} is not a supported image, expected one of: {}",
				path.display(),
				SUPPORTED_EXTENSIONS.join(", ")
			),
			ImageLoadError::ImageLoad(e) => write!(f, "Failed to load the image file: {e}"),
		}
	}
}

/// Everything that can stop the palette from being printed
#[derive(Debug)]
enum AppError {
	/// Failed to load the input image
	Load(ImageLoadError),
	/// The image has no palette, e.g., because it has no pixels
	Palette(base8::Error),
	/// Failed to write the blurred image
	Save(image::ImageError),
	/// Failed to create the thread pool
	#[cfg(feature = "threads")]
	ThreadPool(rayon::ThreadPoolBuildError),
}

impl Display for AppError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			AppError::Load(e) => write!(f, "{e}"),
			AppError::Palette(e) => write!(f, "Failed to generate the palette: {e}"),
			AppError::Save(e) => write!(f, "Failed to save the blurred image: {e}"),
			#[cfg(feature = "threads")]
			AppError::ThreadPool(e) => write!(f, "Failed to create the thread pool: {e}"),
		}
	}
}

impl From<ImageLoadError> for AppError {
	fn from(e: ImageLoadError) -> Self {
		AppError::Load(e)
	}
}

impl From<base8::Error> for AppError {
	fn from(e: base8::Error) -> Self {
		AppError::Palette(e)
	}
}

fn main() -> ExitCode {
	let options = Options::parse();

	let result = run_generate_and_print_palette(&options);

	// Returning Result<_> uses Debug printing instead of Display
	if let Err(e) = result {
		eprintln!("{e}");
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	}
}

/// Builds a thread pool and then runs `generate_and_print_palette`
#[cfg(feature = "threads")]
fn run_generate_and_print_palette(options: &Options) -> Result<(), AppError> {
	let pool = rayon::ThreadPoolBuilder::new()
		.num_threads(usize::from(options.threads))
		.build()
		.map_err(AppError::ThreadPool)?;

	pool.install(|| generate_and_print_palette(options))
}

/// Runs `generate_and_print_palette` on a single thread
#[cfg(not(feature = "threads"))]
fn run_generate_and_print_palette(options: &Options) -> Result<(), AppError> {
	generate_and_print_palette(options)
}

/// The two palettes, ready for printing
struct Colors {
	/// The prominent colors, descending by (red, green, blue)
	palette: Vec<Srgb<u8>>,
	/// The tonal ramp, darkest first
	base8: Vec<Srgb<u8>>,
}

/// Load an image, generate its palettes, and print the result using the given options
fn generate_and_print_palette(options: &Options) -> Result<(), AppError> {
	// Input
	let img = time!("Image loading", options.verbose, load_image(&options.image))?;
	let img = generate_thumbnail(img, options.max_pixels, options.verbose);
	let img = img.into_rgba8();

	// Processing
	let colors = {
		let start = Instant::now();
		let result = generate_colors(&img, options);
		if options.verbose {
			println!("Palette generation took {}ms in total", start.elapsed().as_millis());
		}
		result?
	};

	// Output
	print_palettes(&colors, options);

	Ok(())
}

/// Check that the path exists and has a supported extension
fn check_path(path: &Path) -> Result<(), ImageLoadError> {
	if !path.exists() {
		return Err(ImageLoadError::Missing(path.to_path_buf()));
	}

	let supported = path.extension().and_then(|ext| ext.to_str()).map_or(false, |ext| {
		SUPPORTED_EXTENSIONS
			.iter()
			.any(|supported| ext.eq_ignore_ascii_case(supported))
	});

	if supported {
		Ok(())
	} else {
		Err(ImageLoadError::UnsupportedFormat(path.to_path_buf()))
	}
}

/// Load the image at the given path
fn load_image(path: &Path) -> Result<DynamicImage, ImageLoadError> {
	check_path(path)?;
	image::open(path).map_err(ImageLoadError::ImageLoad)
}

/// Create a thumbnail with at most `max_pixels` pixels if the image has more than `max_pixels` pixels
fn generate_thumbnail(image: DynamicImage, max_pixels: u32, verbose: bool) -> DynamicImage {
	// The number of pixels should be < u64::MAX, since image dimensions are (u32, u32)
	let (width, height) = image.dimensions();
	let pixels = u64::from(width) * u64::from(height);
	if pixels <= u64::from(max_pixels) {
		if verbose {
			println!("Skipping image thumbnail since pixels was below max pixels");
		}

		image
	} else {
		// (u64 as f64) only gives innaccurate results for very large u64
		// I.e, only when pixels is in the order of quintillions
		#[allow(clippy::cast_precision_loss)]
		let scale = (f64::from(max_pixels) / pixels as f64).sqrt();

		// multiplying by a positive factor < 1
		#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
		let (thumb_width, thumb_height) = (
			(f64::from(width) * scale) as u32,
			(f64::from(height) * scale) as u32,
		);

		if verbose {
			println!("Creating a thumbnail with dimensions {thumb_width}x{thumb_height}");
		}

		time!("Image thumbnail", verbose, image.thumbnail(thumb_width, thumb_height))
	}
}

/// Generate both palettes from the given image and options
fn generate_colors(image: &RgbaImage, options: &Options) -> Result<Colors, AppError> {
	let Options {
		grid,
		blur_radius,
		verbose,
		..
	} = *options;

	let ramp = time!("Tonal ramp", verbose, Ramp::from_image(image))?;

	let blurred = time!("Blur", verbose, StackBlur::new(blur_radius).blur(image));

	if let Some(path) = &options.save_blurred {
		blurred
			.save_with_format(path, ImageFormat::Png)
			.map_err(AppError::Save)?;

		if verbose {
			println!("Saved the blurred image to {}", path.display());
		}
	}

	let tiles = time!("Tiling", verbose, base8::partition(&blurred, grid))?;

	if verbose {
		if let Some(tile) = tiles.first() {
			let rect = tile.rect();
			println!("Split the image into {} tiles of {}x{}", tiles.len(), rect.width, rect.height);
		} else {
			println!("The image has no tiles for a grid of {grid}");
		}
	}

	let dominant = time!("Sampling", verbose, histogram::sample(&tiles))?;

	let palette = order::sort_colors_descending(dominant.into_iter().map(color::to_srgb).collect());
	let base8 = ramp.colors().iter().copied().map(color::to_srgb).collect();

	Ok(Colors { palette, base8 })
}

/// Print the palettes selected by the options, prominent colors first
fn print_palettes(colors: &Colors, options: &Options) {
	if options.only != Some(OnlyOutput::Base8) {
		print_palette(&colors.palette, options);
	}
	if options.only != Some(OnlyOutput::Palette) {
		print_palette(&colors.base8, options);
	}
}

/// Print the given colors based off the provided options
fn print_palette(colors: &[Srgb<u8>], options: &Options) {
	match options.output {
		FormatOutput::Hex => color_format_print(colors, options, " ", color::srgb_to_hex),

		FormatOutput::Rgb => color_format_print(colors, options, " ", |color| {
			format!("({},{},{})", color.red, color.green, color.blue)
		}),

		FormatOutput::Swatch => print_colors(colors, "", |color| {
			"   ".on_truecolor(color.red, color.green, color.blue).to_string()
		}),
	}
}

/// Print a line of colors using the given format
fn print_colors(colors: &[Srgb<u8>], delimiter: &str, format: impl Fn(Srgb<u8>) -> String) {
	println!("{}", format_colors(colors, delimiter, format));
}

/// Join the formatted colors with the delimiter
fn format_colors(colors: &[Srgb<u8>], delimiter: &str, format: impl Fn(Srgb<u8>) -> String) -> String {
	colors
		.iter()
		.map(|&color| format(color))
		.collect::<Vec<_>>()
		.join(delimiter)
}

/// Format, colorize, and then print the text for all colors
fn color_format_print(
	colors: &[Srgb<u8>],
	options: &Options,
	delimiter: &str,
	format: impl Fn(Srgb<u8>) -> String,
) {
	match options.colorize {
		Some(ColorizeOutput::Fg) => print_colors(colors, delimiter, |color| {
			format(color)
				.truecolor(color.red, color.green, color.blue)
				.to_string()
		}),

		Some(ColorizeOutput::Bg) => print_colors(colors, delimiter, |color| {
			format(color)
				.on_truecolor(color.red, color.green, color.blue)
				.to_string()
		}),

		None => print_colors(colors, delimiter, format),
	}
}
