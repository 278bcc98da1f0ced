//! Orders a palette for display: descending by (red, green, blue)

use crate::{color, Error};
use palette::Srgb;

/// The sort key of a color, comparing red first, then green, then blue
const fn rgb_key(color: &Srgb<u8>) -> (u8, u8, u8) {
	(color.red, color.green, color.blue)
}

/// Sort colors ascending by `(red, green, blue)` and then reverse the whole sequence
#[must_use]
pub fn sort_colors_descending(mut colors: Vec<Srgb<u8>>) -> Vec<Srgb<u8>> {
	colors.sort_by_key(rgb_key);
	colors.reverse();
	colors
}

/// Sort `#rrggbb` hexcodes descending by `(red, green, blue)`, returning lowercase hexcodes
///
/// # Errors
/// Returns [`Error::InvalidHex`] for the first hexcode that cannot be parsed.
pub fn sort_descending<S: AsRef<str>>(hexcodes: &[S]) -> Result<Vec<String>, Error> {
	let colors = hexcodes
		.iter()
		.map(|hex| color::from_hex(hex.as_ref()))
		.collect::<Result<Vec<_>, _>>()?;

	Ok(sort_colors_descending(colors).into_iter().map(color::srgb_to_hex).collect())
}
