//! Derive a small, deterministic color palette from an image.
//!
//! Two palettes are produced:
//! - a "base8" tonal ramp: 8 increasingly lighter colors anchored at the image's darkest pixel.
//! - prominent colors: the most frequent color of each tile of a blurred copy of the image,
//!   sorted descending by `(red, green, blue)`.
//!
//! # Examples
//!
//! ## Read an image file and get both palettes.
//!
//! ```no_run
//! let image = image::open("some image").unwrap().into_rgba8();
//! let palette = base8::Palette::from_image(&image).unwrap();
//!
//! println!("{:?}", palette.base8);
//! println!("{:?}", palette.prominent);
//! ```
//!
//! ## Use a finer grid and a smaller blur radius.
//!
//! ```no_run
//! let image = image::open("some image").unwrap().into_rgba8();
//! let palette = base8::Palette::builder(&image).grid(6).blur_radius(12).generate().unwrap();
//! ```
//!
//! ## Provide your own blur.
//!
//! ```no_run
//! let image = image::open("some image").unwrap().into_rgba8();
//! let gaussian = |img: &image::RgbaImage| image::imageops::blur(img, 8.0);
//! let colors = base8::prominent_colors_with(&image, 4, &gaussian).unwrap();
//! ```
//!
//! # Arguments
//!
//! ## Grid
//!
//! The image is split into `grid` x `grid` tiles of `ceil(width / grid)` x `ceil(height / grid)` pixels.
//! Only tiles that fit fully inside the image are sampled,
//! so there may be fewer than `grid` tiles along a dimension that is not divisible by `grid`.
//! A grid of `0` gives an empty palette.
//!
//! ## Blur Radius
//!
//! Before tiling, the image is smoothed with a stack blur of this radius (see [`StackBlur`]).
//! Without it, a tile's most frequent exact color would often be decided by noise
//! like anti-aliased edges or compression artifacts.
//! Larger radii merge more of each tile's neighborhood together.

#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::cargo)]
#![warn(clippy::use_debug, clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![warn(clippy::unwrap_used, clippy::unwrap_in_result)]
#![warn(clippy::unneeded_field_pattern, clippy::rest_pat_in_fully_bound_structs)]
#![warn(clippy::unnecessary_self_imports)]
#![warn(clippy::str_to_string, clippy::string_to_string, clippy::string_slice)]
#![warn(missing_docs, clippy::missing_docs_in_private_items, rustdoc::all)]
#![warn(clippy::float_cmp_const, clippy::lossy_float_literal)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::enum_glob_use)]
#![allow(clippy::unreadable_literal)]

use image::{Rgba, RgbaImage};
use std::fmt::{self, Display};

pub mod blur;
pub mod color;
pub mod histogram;
pub mod order;
pub mod ramp;
pub mod tile;

pub use blur::{Blur, StackBlur, DEFAULT_BLUR_RADIUS};
pub use histogram::{dominant_color, ColorCounts};
pub use order::sort_descending;
pub use ramp::{tonal_ramp, Ramp};
pub use tile::{partition, Tile, DEFAULT_GRID};

/// Errors from extracting a palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// The image has zero width or height
	EmptyImage,
	/// A tile has no pixels, so it has no dominant color
	EmptyTile,
	/// A string is not a `#rrggbb` hexcode
	InvalidHex(String),
}

impl Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::EmptyImage => write!(f, "The image has no pixels"),
			Error::EmptyTile => write!(f, "Cannot pick a dominant color from a tile with no pixels"),
			Error::InvalidHex(hex) => write!(f, "{hex:?} is not a #rrggbb hexcode"),
		}
	}
}

impl std::error::Error for Error {}

/// Parameters for extracting prominent colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteOptions {
	/// The number of tiles along each dimension
	pub grid: u32,
	/// The radius of the stack blur applied before tiling
	pub blur_radius: u32,
}

impl Default for PaletteOptions {
	fn default() -> Self {
		Self {
			grid: DEFAULT_GRID,
			blur_radius: DEFAULT_BLUR_RADIUS,
		}
	}
}

/// Both palettes for an image, as lowercase `#rrggbb` hexcodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	/// The 8-step tonal ramp, darkest first
	pub base8: Vec<String>,
	/// The prominent colors, descending by `(red, green, blue)`
	pub prominent: Vec<String>,
}

impl Palette {
	/// Start configuring the palettes for `image`, beginning from [`PaletteOptions::default`]
	#[must_use]
	pub fn builder(image: &RgbaImage) -> PaletteBuilder<'_> {
		PaletteBuilder { image, options: PaletteOptions::default() }
	}

	/// Extract both palettes using a 4 x 4 grid and a blur radius of 30
	///
	/// # Errors
	/// Returns [`Error::EmptyImage`] if the image has no pixels.
	pub fn from_image(image: &RgbaImage) -> Result<Self, Error> {
		Self::with_options(image, PaletteOptions::default())
	}

	/// Extract both palettes using the given options
	///
	/// # Errors
	/// Returns [`Error::EmptyImage`] if the image has no pixels.
	pub fn with_options(image: &RgbaImage, options: PaletteOptions) -> Result<Self, Error> {
		Self::with_blur(image, options.grid, &StackBlur::new(options.blur_radius))
	}

	/// Extract both palettes, smoothing the image with `blur` before tiling
	///
	/// # Errors
	/// Returns [`Error::EmptyImage`] if the image has no pixels.
	pub fn with_blur(image: &RgbaImage, grid: u32, blur: &impl Blur) -> Result<Self, Error> {
		// the ramp uses the original, unblurred image
		let base8 = tonal_ramp(image)?;
		let prominent = prominent_colors_with(image, grid, blur)?;
		Ok(Self { base8, prominent })
	}
}

/// Configures and then extracts a [`Palette`], see [`Palette::builder`]
#[derive(Debug, Clone, Copy)]
pub struct PaletteBuilder<'a> {
	/// The image to extract the palettes from
	image: &'a RgbaImage,
	/// The options so far
	options: PaletteOptions,
}

impl PaletteBuilder<'_> {
	/// Set the number of tiles along each dimension
	#[must_use]
	pub fn grid(self, grid: u32) -> Self {
		Self { options: PaletteOptions { grid, ..self.options }, ..self }
	}

	/// Set the radius of the default stack blur
	#[must_use]
	pub fn blur_radius(self, blur_radius: u32) -> Self {
		Self { options: PaletteOptions { blur_radius, ..self.options }, ..self }
	}

	/// Replace all options at once
	#[must_use]
	pub fn options(self, options: PaletteOptions) -> Self {
		Self { options, ..self }
	}

	/// The options that [`PaletteBuilder::generate`] will use
	#[must_use]
	pub const fn current_options(&self) -> PaletteOptions {
		self.options
	}

	/// Extract both palettes, smoothing with a [`StackBlur`] of the configured radius
	///
	/// # Errors
	/// Returns [`Error::EmptyImage`] if the image has no pixels.
	pub fn generate(self) -> Result<Palette, Error> {
		Palette::with_options(self.image, self.options)
	}

	/// Extract both palettes, smoothing with `blur` instead of a stack blur
	///
	/// The configured blur radius is ignored.
	///
	/// # Errors
	/// Returns [`Error::EmptyImage`] if the image has no pixels.
	pub fn generate_with(self, blur: &impl Blur) -> Result<Palette, Error> {
		Palette::with_blur(self.image, self.options.grid, blur)
	}
}

/// Returns the dominant color of each tile of the blurred image, in tile order
///
/// # Errors
/// Returns [`Error::EmptyImage`] if the image (or the blurred image) has no pixels.
pub fn raw_palette(blurred: &RgbaImage, grid: u32) -> Result<Vec<Rgba<u8>>, Error> {
	let tiles = partition(blurred, grid)?;
	histogram::sample(&tiles)
}

/// Returns the prominent colors of the image as lowercase `#rrggbb` hexcodes,
/// sorted descending by `(red, green, blue)`
///
/// The image is smoothed with a [`StackBlur`] of radius [`DEFAULT_BLUR_RADIUS`] before tiling.
///
/// # Errors
/// Returns [`Error::EmptyImage`] if the image has no pixels.
pub fn prominent_colors(image: &RgbaImage, grid: u32) -> Result<Vec<String>, Error> {
	prominent_colors_with(image, grid, &StackBlur::default())
}

/// Returns the prominent colors of the image as lowercase `#rrggbb` hexcodes,
/// sorted descending by `(red, green, blue)`, smoothing the image with `blur` before tiling
///
/// # Errors
/// Returns [`Error::EmptyImage`] if the image has no pixels.
pub fn prominent_colors_with(image: &RgbaImage, grid: u32, blur: &impl Blur) -> Result<Vec<String>, Error> {
	if image.width() == 0 || image.height() == 0 {
		return Err(Error::EmptyImage);
	}

	let blurred = blur.blur(image);
	let colors = raw_palette(&blurred, grid)?;
	Ok(order::sort_colors_descending(colors.into_iter().map(color::to_srgb).collect())
		.into_iter()
		.map(color::srgb_to_hex)
		.collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;
	use itertools::Itertools;
	use rand::{Rng, SeedableRng};

	/// No smoothing, so tile colors can be checked exactly
	fn identity(image: &RgbaImage) -> RgbaImage {
		image.clone()
	}

	/// A 4 x 4 grid of solid 10 x 10 blocks
	fn blocks(colors: &[Rgba<u8>; 16]) -> RgbaImage {
		RgbaImage::from_fn(40, 40, |x, y| colors[(y / 10 * 4 + x / 10) as usize])
	}

	fn block_colors() -> [Rgba<u8>; 16] {
		let mut colors = [Rgba([0, 0, 0, 255]); 16];
		for (i, color) in (0u8..).zip(&mut colors) {
			*color = Rgba([i * 16, 255 - i * 8, i * 3, 255]);
		}
		colors
	}

	#[test]
	fn prominent_colors_of_solid_blocks() {
		let colors = block_colors();
		let image = blocks(&colors);

		let mut expected = colors.map(color::to_hex).to_vec();
		expected.sort();
		expected.reverse();

		assert_eq!(prominent_colors_with(&image, 4, &identity).unwrap(), expected);
	}

	#[test]
	fn prominent_colors_round_trip_hex() {
		let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(3);
		let image = RgbaImage::from_fn(48, 32, |_, _| Rgba(rng.gen()));

		let colors = prominent_colors(&image, DEFAULT_GRID).unwrap();
		assert_eq!(colors.len(), 16);
		for hex in &colors {
			assert_eq!(&color::srgb_to_hex(color::from_hex(hex).unwrap()), hex);
		}
	}

	#[test]
	fn prominent_colors_are_non_increasing() {
		let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(11);
		for grid in 1..6 {
			let image = RgbaImage::from_fn(30, 45, |_, _| Rgba(rng.gen()));
			let colors = prominent_colors_with(&image, grid, &StackBlur::new(2)).unwrap();

			for (x, y) in colors.iter().tuple_windows() {
				let x = color::from_hex(x).unwrap();
				let y = color::from_hex(y).unwrap();
				assert!((x.red, x.green, x.blue) >= (y.red, y.green, y.blue));
			}
		}
	}

	#[test]
	fn blur_is_applied_before_tiling() {
		let image = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
		let white = |image: &RgbaImage| RgbaImage::from_pixel(image.width(), image.height(), Rgba([255; 4]));

		assert_eq!(prominent_colors_with(&image, 2, &white).unwrap(), vec!["#ffffff"; 4]);
	}

	#[test]
	fn zero_grid_gives_empty_palette() {
		let image = RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255]));
		assert!(prominent_colors(&image, 0).unwrap().is_empty());
	}

	#[test]
	fn empty_image_is_rejected() {
		let image = RgbaImage::new(0, 0);
		assert_eq!(prominent_colors(&image, 4), Err(Error::EmptyImage));
		assert_eq!(Palette::from_image(&image), Err(Error::EmptyImage));
	}

	#[test]
	fn palette_uses_original_image_for_ramp() {
		let mut image = blocks(&block_colors());
		image.put_pixel(39, 39, Rgba([0, 0, 0, 255]));

		let palette = Palette::with_blur(&image, 4, &identity).unwrap();

		assert_eq!(palette.base8[0], "#000000");
		assert_eq!(palette.base8.len(), 8);
		assert_eq!(palette.prominent.len(), 16);
		assert!(!palette.prominent.contains(&"#000000".to_owned()));
	}

	#[test]
	fn default_options() {
		let image = RgbaImage::from_pixel(12, 12, Rgba([90, 80, 70, 255]));
		let palette = Palette::from_image(&image).unwrap();

		assert_eq!(palette, Palette::with_options(&image, PaletteOptions::default()).unwrap());
		assert_eq!(palette.prominent, vec!["#5a5046"; 16]);
		assert_eq!(palette.base8[..2], ["#5a5046", "#7a7066"]);
	}

	#[test]
	fn builder_matches_options() {
		let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(5);
		let image = RgbaImage::from_fn(36, 24, |_, _| Rgba(rng.gen()));

		let builder = Palette::builder(&image).grid(3).blur_radius(4);
		assert_eq!(builder.current_options(), PaletteOptions { grid: 3, blur_radius: 4 });
		assert_eq!(
			builder.generate().unwrap(),
			Palette::with_options(&image, PaletteOptions { grid: 3, blur_radius: 4 }).unwrap()
		);

		let defaults = Palette::builder(&image);
		assert_eq!(defaults.current_options(), PaletteOptions::default());
		assert_eq!(defaults.generate().unwrap(), Palette::from_image(&image).unwrap());
	}

	#[test]
	fn builder_with_custom_blur() {
		let colors = block_colors();
		let image = blocks(&colors);

		let palette = Palette::builder(&image).blur_radius(100).generate_with(&identity).unwrap();
		assert_eq!(palette.prominent, prominent_colors_with(&image, 4, &identity).unwrap());

		let coarse = Palette::builder(&image).options(PaletteOptions { grid: 2, blur_radius: 0 });
		assert_eq!(coarse.generate().unwrap().prominent.len(), 4);
		assert!(Palette::builder(&RgbaImage::new(0, 3)).generate().is_err());
	}

	#[test]
	fn errors_display() {
		assert_eq!(Error::InvalidHex("#12".to_owned()).to_string(), "\"#12\" is not a #rrggbb hexcode");
	}
}
