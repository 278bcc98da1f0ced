//! Pixel color helpers shared by the ramp, sampler, and orderer

use crate::Error;
use image::Rgba;
use palette::Srgb;

/// Perceptual weight of the red channel
const RED_WEIGHT: f64 = 0.2126;
/// Perceptual weight of the green channel
const GREEN_WEIGHT: f64 = 0.7152;
/// Perceptual weight of the blue channel
const BLUE_WEIGHT: f64 = 0.0722;

/// Fully opaque white, the starting point for the darkest color search
pub const WHITE: Rgba<u8> = Rgba([u8::MAX, u8::MAX, u8::MAX, u8::MAX]);

/// Perceptual luminance of the 8-bit, gamma-encoded channels. Alpha is ignored.
#[must_use]
pub fn luminance(Rgba([r, g, b, _]): Rgba<u8>) -> f64 {
	RED_WEIGHT * f64::from(r) + GREEN_WEIGHT * f64::from(g) + BLUE_WEIGHT * f64::from(b)
}

/// Returns the color with its alpha forced to 255
#[must_use]
pub const fn opaque(Rgba([r, g, b, _]): Rgba<u8>) -> Rgba<u8> {
	Rgba([r, g, b, u8::MAX])
}

/// Drops the alpha channel
#[must_use]
pub const fn to_srgb(Rgba([r, g, b, _]): Rgba<u8>) -> Srgb<u8> {
	Srgb::new(r, g, b)
}

/// Encodes a color as a lowercase `#rrggbb` hexcode, dropping alpha
#[must_use]
pub fn to_hex(color: Rgba<u8>) -> String {
	srgb_to_hex(to_srgb(color))
}

/// Encodes an [`Srgb`] color as a lowercase `#rrggbb` hexcode
#[must_use]
pub fn srgb_to_hex(color: Srgb<u8>) -> String {
	format!("#{color:x}")
}

/// Parses a `#rrggbb` hexcode
///
/// # Errors
/// Returns [`Error::InvalidHex`] if `hex` is not six hex digits with an optional leading `#`.
pub fn from_hex(hex: &str) -> Result<Srgb<u8>, Error> {
	// palette also accepts the short `#rgb` form, which never comes out of `to_hex`
	let digits = hex.strip_prefix('#').unwrap_or(hex);
	// palette slices by byte index, so non-ascii input must not reach it
	if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
		return Err(Error::InvalidHex(hex.to_owned()));
	}

	hex.parse::<Srgb<u8>>().map_err(|_| Error::InvalidHex(hex.to_owned()))
}
