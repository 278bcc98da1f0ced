//! Finds the darkest color of an image and builds an 8-step tonal ramp from it

use crate::{
	color::{self, luminance, opaque, WHITE},
	Error,
};
use image::{Rgba, RgbaImage};
use std::iter;

/// The number of colors in a [`Ramp`]
pub const RAMP_LEN: usize = 8;

/// The amount added to each channel between consecutive ramp colors,
/// i.e., `round(0.125 * 255)` so that 8 steps span the full channel range
pub const RAMP_STEP: u8 = 32;

/// An 8-step monochromatic progression anchored at an image's darkest color
///
/// Every channel is non-decreasing from one color to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ramp([Rgba<u8>; RAMP_LEN]);

impl Ramp {
	/// Build a ramp starting at `base`, lightening each channel by [`RAMP_STEP`] per step
	///
	/// Channels saturate at 255, and the alpha of every color is 255.
	#[must_use]
	pub fn from_base(base: Rgba<u8>) -> Self {
		let mut colors = [WHITE; RAMP_LEN];
		for (slot, color) in colors.iter_mut().zip(iter::successors(Some(opaque(base)), |&c| Some(lighten(c)))) {
			*slot = color;
		}
		Self(colors)
	}

	/// Build the ramp for the darkest color in the image
	///
	/// # Errors
	/// Returns [`Error::EmptyImage`] if the image has no pixels.
	pub fn from_image(image: &RgbaImage) -> Result<Self, Error> {
		darkest(image).map(Self::from_base)
	}

	/// The colors of the ramp, darkest first
	#[must_use]
	pub const fn colors(&self) -> &[Rgba<u8>; RAMP_LEN] {
		&self.0
	}

	/// The darkest (first) color
	#[must_use]
	pub const fn base(&self) -> Rgba<u8> {
		self.0[0]
	}

	/// The colors as lowercase `#rrggbb` hexcodes
	#[must_use]
	pub fn to_hex(&self) -> Vec<String> {
		self.0.iter().copied().map(color::to_hex).collect()
	}
}

/// Lighten each channel by one ramp step
const fn lighten(Rgba([r, g, b, a]): Rgba<u8>) -> Rgba<u8> {
	Rgba([r.saturating_add(RAMP_STEP), g.saturating_add(RAMP_STEP), b.saturating_add(RAMP_STEP), a])
}

/// Keep `current` unless `candidate` is strictly darker
fn darker(current: Rgba<u8>, candidate: Rgba<u8>) -> Rgba<u8> {
	if luminance(candidate) < luminance(current) {
		candidate
	} else {
		current
	}
}

/// Find the darkest of a row-major run of pixels, starting from `WHITE`
fn darkest_in(pixels: impl Iterator<Item = Rgba<u8>>) -> Rgba<u8> {
	pixels.map(opaque).fold(WHITE, darker)
}

/// Returns the pixel with the lowest luminance, with its alpha set to 255
///
/// If multiple pixels share the lowest luminance, the first one in row-major order is returned.
/// An image with no pixel darker than white returns white.
///
/// # Errors
/// Returns [`Error::EmptyImage`] if the image has no pixels.
#[cfg(not(feature = "threads"))]
pub fn darkest(image: &RgbaImage) -> Result<Rgba<u8>, Error> {
	if image.width() == 0 || image.height() == 0 {
		return Err(Error::EmptyImage);
	}

	Ok(darkest_in(image.pixels().copied()))
}

/// Returns the pixel with the lowest luminance, with its alpha set to 255
///
/// If multiple pixels share the lowest luminance, the first one in row-major order is returned.
/// An image with no pixel darker than white returns white.
///
/// # Errors
/// Returns [`Error::EmptyImage`] if the image has no pixels.
#[cfg(feature = "threads")]
pub fn darkest(image: &RgbaImage) -> Result<Rgba<u8>, Error> {
	use rayon::prelude::*;

	if image.width() == 0 || image.height() == 0 {
		return Err(Error::EmptyImage);
	}

	let row_len = image.width() as usize * 4;

	// `darker` keeps the left operand on ties and rayon reduces adjacent rows in order,
	// so the result matches the sequential scan
	Ok(image
		.as_raw()
		.par_chunks_exact(row_len)
		.map(|row| darkest_in(row.chunks_exact(4).map(|px| Rgba([px[0], px[1], px[2], px[3]]))))
		.reduce(|| WHITE, darker))
}

/// Returns the 8-step tonal ramp for the image as lowercase `#rrggbb` hexcodes
///
/// # Errors
/// Returns [`Error::EmptyImage`] if the image has no pixels.
pub fn tonal_ramp(image: &RgbaImage) -> Result<Vec<String>, Error> {
	Ramp::from_image(image).map(|ramp| ramp.to_hex())
}
