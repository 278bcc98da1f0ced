//! Finds the most frequent color in each tile

use crate::{tile::Tile, Error};
use image::Rgba;
use std::collections::HashMap;

/// Deduplicated colors of a tile and the number of pixels of each color
///
/// Colors are kept in the order they were first seen in a row-major scan.
#[derive(Debug, Clone, Default)]
pub struct ColorCounts {
	/// Unique colors, in first-seen order
	colors: Vec<Rgba<u8>>,
	/// The number of pixels for each color
	counts: Vec<u32>,
}

impl ColorCounts {
	/// Count the colors of the given pixels, keeping alpha
	#[must_use]
	pub fn from_pixels(pixels: impl IntoIterator<Item = Rgba<u8>>) -> Self {
		let mut data = Self::default();

		// Packed Rgba -> data index
		let mut memo: HashMap<u32, u32> = HashMap::new();

		for pixel in pixels {
			let key = u32::from_be_bytes(pixel.0);
			let index = *memo.entry(key).or_insert_with(|| {
				// at most 2^32 unique colors can be packed into a u32 key
				#[allow(clippy::cast_possible_truncation)]
				let index = data.colors.len() as u32;

				data.colors.push(pixel);
				data.counts.push(0);
				index
			});

			let count = &mut data.counts[index as usize];
			*count = count.saturating_add(1);
		}

		data
	}

	/// Count the colors in a tile
	#[must_use]
	pub fn from_tile(tile: &Tile) -> Self {
		Self::from_pixels(tile.pixels())
	}

	/// The unique colors, in first-seen order
	#[must_use]
	pub fn colors(&self) -> &[Rgba<u8>] {
		&self.colors
	}

	/// The number of pixels of each color in [`ColorCounts::colors`]
	#[must_use]
	pub fn counts(&self) -> &[u32] {
		&self.counts
	}

	/// The number of unique colors
	#[must_use]
	pub fn num_colors(&self) -> usize {
		self.colors.len()
	}

	/// Iterate over each color and its count
	pub fn pairs(&self) -> impl Iterator<Item = (Rgba<u8>, u32)> + '_ {
		self.colors.iter().copied().zip(self.counts.iter().copied())
	}

	/// The color with the highest count, or `None` if there are no colors
	///
	/// Ties go to the color that was seen first.
	#[must_use]
	pub fn most_frequent(&self) -> Option<Rgba<u8>> {
		let mut best: Option<(Rgba<u8>, u32)> = None;
		for (color, count) in self.pairs() {
			if best.map_or(true, |(_, max)| count > max) {
				best = Some((color, count));
			}
		}
		best.map(|(color, _)| color)
	}
}

/// Returns the most frequent exact color in the tile
///
/// Ties go to the color first encountered in the tile's row-major scan.
///
/// # Errors
/// Returns [`Error::EmptyTile`] if the tile has no pixels.
pub fn dominant_color(tile: &Tile) -> Result<Rgba<u8>, Error> {
	if tile.is_empty() {
		return Err(Error::EmptyTile);
	}

	ColorCounts::from_tile(tile).most_frequent().ok_or(Error::EmptyTile)
}

/// Returns the dominant color of each tile, in tile order
///
/// # Errors
/// Returns [`Error::EmptyTile`] if any tile has no pixels.
#[cfg(not(feature = "threads"))]
pub fn sample(tiles: &[Tile]) -> Result<Vec<Rgba<u8>>, Error> {
	tiles.iter().map(dominant_color).collect()
}

/// Returns the dominant color of each tile, in tile order
///
/// # Errors
/// Returns [`Error::EmptyTile`] if any tile has no pixels.
#[cfg(feature = "threads")]
pub fn sample(tiles: &[Tile]) -> Result<Vec<Rgba<u8>>, Error> {
	use rayon::prelude::*;

	// indexed collect keeps tile order
	tiles.par_iter().map(dominant_color).collect()
}
