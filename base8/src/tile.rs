//! Divides an image into a grid of equally sized, non-overlapping tiles

use crate::Error;
use image::{math::Rect, GenericImageView, Rgba, RgbaImage, SubImage};

/// The grid dimension used when extracting prominent colors, giving up to 4 x 4 = 16 tiles
pub const DEFAULT_GRID: u32 = 4;

/// A read-only rectangular window into an image
///
/// A tile never copies pixel data and always lies within its image's bounds.
#[derive(Debug, Clone, Copy)]
pub struct Tile<'a> {
	/// The image this tile is a window into
	image: &'a RgbaImage,
	/// The offset and extent of the window
	rect: Rect,
}

impl<'a> Tile<'a> {
	/// Create a tile over `rect`, or `None` if `rect` does not lie fully within `image`
	#[must_use]
	pub fn new(image: &'a RgbaImage, rect: Rect) -> Option<Self> {
		let (width, height) = image.dimensions();
		let fits = u64::from(rect.x) + u64::from(rect.width) <= u64::from(width)
			&& u64::from(rect.y) + u64::from(rect.height) <= u64::from(height);

		fits.then_some(Self { image, rect })
	}

	/// The offset and extent of this tile within its image
	#[must_use]
	pub const fn rect(&self) -> Rect {
		self.rect
	}

	/// The number of pixels in this tile
	#[must_use]
	pub fn num_pixels(&self) -> u64 {
		u64::from(self.rect.width) * u64::from(self.rect.height)
	}

	/// Whether this tile has no pixels
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.num_pixels() == 0
	}

	/// The tile's pixels in row-major order
	pub fn pixels(&self) -> impl Iterator<Item = Rgba<u8>> + 'a {
		let Self { image, rect } = *self;
		(rect.y..rect.y + rect.height)
			.flat_map(move |y| (rect.x..rect.x + rect.width).map(move |x| *image.get_pixel(x, y)))
	}

	/// A view of the tile's pixels, with coordinates relative to the tile's origin
	#[must_use]
	pub fn view(&self) -> SubImage<&'a RgbaImage> {
		let Rect { x, y, width, height } = self.rect;
		self.image.view(x, y, width, height)
	}
}

/// Split the image into a `grid` x `grid` arrangement of tiles, in row-major order
///
/// Tiles are `ceil(width / grid)` x `ceil(height / grid)` pixels, and only tiles that fit fully
/// within the image are returned. So, if a dimension is not divisible by `grid`, there may be
/// fewer than `grid` tiles along that axis, and the leftover strip at the right or bottom edge is dropped.
///
/// A `grid` of `0` gives no tiles.
///
/// # Errors
/// Returns [`Error::EmptyImage`] if the image has no pixels.
pub fn partition(image: &RgbaImage, grid: u32) -> Result<Vec<Tile<'_>>, Error> {
	let (width, height) = image.dimensions();
	if width == 0 || height == 0 {
		return Err(Error::EmptyImage);
	}

	if grid == 0 {
		return Ok(Vec::new());
	}

	let tile_width = width.div_ceil(grid);
	let tile_height = height.div_ceil(grid);

	// the grid may be far larger than the image, so only reserve for tiles that fit
	let mut tiles = Vec::with_capacity((width / tile_width) as usize * (height / tile_height) as usize);

	// u64 so that `y + tile_height` cannot overflow for images near u32::MAX
	let (width, height) = (u64::from(width), u64::from(height));
	let mut y = 0;
	while u64::from(y) + u64::from(tile_height) <= height {
		let mut x = 0;
		while u64::from(x) + u64::from(tile_width) <= width {
			let rect = Rect { x, y, width: tile_width, height: tile_height };
			tiles.push(Tile { image, rect });
			x += tile_width;
		}
		y += tile_height;
	}

	Ok(tiles)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;
	use image::Rgba;

	fn rects(image: &RgbaImage, grid: u32) -> Vec<Rect> {
		partition(image, grid).unwrap().iter().map(Tile::rect).collect()
	}

	#[test]
	fn divisible_image_is_fully_covered() {
		let image = RgbaImage::new(100, 100);
		let rects = rects(&image, 4);

		assert_eq!(rects.len(), 16);
		for (i, rect) in (0..).zip(&rects) {
			assert_eq!(
				*rect,
				Rect {
					x: (i % 4) * 25,
					y: (i / 4) * 25,
					width: 25,
					height: 25,
				}
			);
		}

		let area = rects.iter().map(|r| r.width * r.height).sum::<u32>();
		assert_eq!(area, 100 * 100);
	}

	#[test]
	fn remainder_is_dropped() {
		let image = RgbaImage::new(101, 101);
		let rects = rects(&image, 4);

		// ceil(101 / 4) = 26, and 3 * 26 = 78 <= 101 < 4 * 26 = 104
		assert_eq!(rects.len(), 9);
		for rect in &rects {
			assert_eq!((rect.width, rect.height), (26, 26));
			assert!(rect.x + rect.width <= 78 && rect.y + rect.height <= 78);
		}
		assert_eq!(rects[0], Rect { x: 0, y: 0, width: 26, height: 26 });
		assert_eq!(rects[8], Rect { x: 52, y: 52, width: 26, height: 26 });
	}

	#[test]
	fn row_major_order() {
		let image = RgbaImage::new(30, 20);
		let rects = rects(&image, 2);

		let origins = rects.iter().map(|r| (r.x, r.y)).collect::<Vec<_>>();
		assert_eq!(origins, [(0, 0), (15, 0), (0, 10), (15, 10)]);
	}

	#[test]
	fn axes_are_independent() {
		// columns: ceil(10 / 4) = 3, so 3 columns; rows: ceil(8 / 4) = 2, so 4 rows
		let image = RgbaImage::new(10, 8);
		let rects = rects(&image, 4);

		assert_eq!(rects.len(), 12);
		assert!(rects.iter().all(|r| r.width == 3 && r.height == 2));
	}

	#[test]
	fn tiles_never_overlap_and_stay_in_bounds() {
		for (w, h, grid) in [(1, 1, 4), (7, 3, 4), (64, 17, 5), (13, 13, 13), (5, 40, 3), (3, 3, 8)] {
			let image = RgbaImage::new(w, h);
			let rects = rects(&image, grid);
			assert!(rects.len() <= (grid * grid) as usize);

			let mut covered = vec![false; (w * h) as usize];
			for r in &rects {
				assert!(r.x + r.width <= w && r.y + r.height <= h);
				for y in r.y..(r.y + r.height) {
					for x in r.x..(r.x + r.width) {
						let i = (y * w + x) as usize;
						assert!(!covered[i], "{w}x{h} grid {grid}: overlap at ({x}, {y})");
						covered[i] = true;
					}
				}
			}
		}
	}

	#[test]
	fn zero_grid_gives_no_tiles() {
		assert!(partition(&RgbaImage::new(10, 10), 0).unwrap().is_empty());
	}

	#[test]
	fn empty_image_is_rejected() {
		assert_eq!(partition(&RgbaImage::new(0, 10), 4).unwrap_err(), Error::EmptyImage);
		assert_eq!(partition(&RgbaImage::new(10, 0), 4).unwrap_err(), Error::EmptyImage);
	}

	#[test]
	fn view_is_relative_to_tile() {
		let image = RgbaImage::from_fn(8, 8, |x, y| Rgba([x as u8, y as u8, 0, 255]));
		let tiles = partition(&image, 2).unwrap();
		let last = tiles[3].view();

		assert_eq!(last.dimensions(), (4, 4));
		assert_eq!(last.get_pixel(0, 0), Rgba([4, 4, 0, 255]));
		assert_eq!(last.get_pixel(3, 1), Rgba([7, 5, 0, 255]));
	}

	#[test]
	fn grid_larger_than_image_gives_single_pixel_tiles() {
		let image = RgbaImage::new(4, 4);
		for grid in [5, 1000, 1 << 20, u32::MAX] {
			let rects = rects(&image, grid);
			assert_eq!(rects.len(), 16);
			assert!(rects.iter().all(|r| r.width == 1 && r.height == 1));
		}
	}

	#[test]
	fn pixels_are_row_major() {
		let image = RgbaImage::from_fn(6, 4, |x, y| Rgba([x as u8, y as u8, 0, 255]));
		let tiles = partition(&image, 2).unwrap();

		let pixels = tiles[3].pixels().map(|Rgba([x, y, _, _])| (x, y)).collect::<Vec<_>>();
		assert_eq!(pixels, [(3, 2), (4, 2), (5, 2), (3, 3), (4, 3), (5, 3)]);
		assert_eq!(tiles[0].pixels().count() as u64, tiles[0].num_pixels());
	}

	#[test]
	fn pixels_match_view() {
		let image = RgbaImage::from_fn(9, 7, |x, y| Rgba([x as u8 * 7, y as u8 * 11, (x + y) as u8, 255]));
		for tile in partition(&image, 3).unwrap() {
			let from_view = tile.view().pixels().map(|(_, _, p)| p).collect::<Vec<_>>();
			assert_eq!(tile.pixels().collect::<Vec<_>>(), from_view);
		}
	}

	#[test]
	fn new_checks_bounds() {
		let image = RgbaImage::new(10, 10);
		assert!(Tile::new(&image, Rect { x: 5, y: 5, width: 5, height: 5 }).is_some());
		assert!(Tile::new(&image, Rect { x: 6, y: 0, width: 5, height: 5 }).is_none());
		assert!(Tile::new(&image, Rect { x: 0, y: 0, width: 0, height: 0 }).unwrap().is_empty());
	}
}
