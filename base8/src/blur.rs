//! Smooths an image before tiling so each tile's histogram reflects its neighborhood and not pixel noise

use image::{Rgba, RgbaImage};

/// The blur radius used when extracting prominent colors
pub const DEFAULT_BLUR_RADIUS: u32 = 30;

/// Larger radii are clamped to this value, which keeps the weighted channel sums within a `u32`
pub const MAX_BLUR_RADIUS: u32 = 254;

/// A filter that smooths an image, returning a new image with the same dimensions
pub trait Blur {
	/// Smooth `image`
	fn blur(&self, image: &RgbaImage) -> RgbaImage;
}

impl<F> Blur for F
where
	F: Fn(&RgbaImage) -> RgbaImage,
{
	fn blur(&self, image: &RgbaImage) -> RgbaImage {
		self(image)
	}
}

/// A separable stack blur over all four channels
///
/// Each pass weights the `2 * radius + 1` pixels around a pixel with a triangular kernel,
/// and pixels past the image edge take the value of the nearest edge pixel.
/// Radii above [`MAX_BLUR_RADIUS`] are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackBlur {
	/// The number of neighboring pixels on each side that contribute to a pixel
	pub radius: u32,
}

impl StackBlur {
	/// Create a [`StackBlur`] with the given radius
	#[must_use]
	pub const fn new(radius: u32) -> Self {
		Self { radius }
	}
}

impl Default for StackBlur {
	fn default() -> Self {
		Self::new(DEFAULT_BLUR_RADIUS)
	}
}

impl Blur for StackBlur {
	fn blur(&self, image: &RgbaImage) -> RgbaImage {
		let (width, height) = image.dimensions();
		if self.radius == 0 || width == 0 || height == 0 {
			return image.clone();
		}

		let radius = self.radius.min(MAX_BLUR_RADIUS) as usize;
		let (width, height) = (width as usize, height as usize);
		let mut pixels = image.pixels().map(|px| px.0).collect::<Vec<_>>();

		blur_rows(&mut pixels, width, radius);

		let mut transposed = transpose(&pixels, width, height);
		blur_rows(&mut transposed, height, radius);
		let pixels = transpose(&transposed, height, width);

		// both dimensions came from u32
		#[allow(clippy::cast_possible_truncation)]
		RgbaImage::from_fn(width as u32, height as u32, |x, y| Rgba(pixels[y as usize * width + x as usize]))
	}
}

/// A pixel's channels widened for accumulation
type Sums = [u32; 4];

/// Adds `weight * px` to `sum`
fn add(sum: &mut Sums, px: [u8; 4], weight: u32) {
	for (s, c) in sum.iter_mut().zip(px) {
		*s += u32::from(c) * weight;
	}
}

/// Subtracts `px` from `sum`
fn sub(sum: &mut Sums, px: [u8; 4]) {
	for (s, c) in sum.iter_mut().zip(px) {
		*s -= u32::from(c);
	}
}

/// Blurs one line of pixels in place
fn blur_line(line: &mut [[u8; 4]], radius: usize, stack: &mut [[u8; 4]]) {
	let len = line.len();
	let div = 2 * radius + 1;
	// radius <= MAX_BLUR_RADIUS
	#[allow(clippy::cast_possible_truncation)]
	let divisor = ((radius + 1) * (radius + 1)) as u32;
	let src = line.to_vec();
	let at = |i: usize| src[i.min(len - 1)];

	let mut sum = [0; 4];
	let mut sum_in = [0; 4];
	let mut sum_out = [0; 4];

	// left half (and center), clamped to the first pixel
	#[allow(clippy::cast_possible_truncation)]
	for (i, slot) in stack.iter_mut().enumerate().take(radius + 1) {
		*slot = src[0];
		add(&mut sum, src[0], i as u32 + 1);
		add(&mut sum_out, src[0], 1);
	}

	// right half
	#[allow(clippy::cast_possible_truncation)]
	for i in 1..=radius {
		let px = at(i);
		stack[i + radius] = px;
		add(&mut sum, px, (radius + 1 - i) as u32);
		add(&mut sum_in, px, 1);
	}

	let mut ptr = radius;
	for (x, out) in line.iter_mut().enumerate() {
		#[allow(clippy::cast_possible_truncation)]
		{
			*out = sum.map(|s| (s / divisor) as u8);
		}

		for (s, o) in sum.iter_mut().zip(sum_out) {
			*s -= o;
		}

		let start = (ptr + div - radius) % div;
		sub(&mut sum_out, stack[start]);

		let px = at(x + radius + 1);
		stack[start] = px;
		add(&mut sum_in, px, 1);

		for (s, i) in sum.iter_mut().zip(sum_in) {
			*s += i;
		}

		ptr = (ptr + 1) % div;
		let center = stack[ptr];
		add(&mut sum_out, center, 1);
		sub(&mut sum_in, center);
	}
}

/// Blurs every row of a row-major pixel buffer
#[cfg(not(feature = "threads"))]
fn blur_rows(pixels: &mut [[u8; 4]], width: usize, radius: usize) {
	let mut stack = vec![[0; 4]; 2 * radius + 1];
	for row in pixels.chunks_exact_mut(width) {
		blur_line(row, radius, &mut stack);
	}
}

/// Blurs every row of a row-major pixel buffer
#[cfg(feature = "threads")]
fn blur_rows(pixels: &mut [[u8; 4]], width: usize, radius: usize) {
	use rayon::prelude::*;

	pixels.par_chunks_exact_mut(width).for_each_init(
		|| vec![[0; 4]; 2 * radius + 1],
		|stack, row| blur_line(row, radius, stack),
	);
}

/// Transposes a row-major `width` x `height` buffer
fn transpose(pixels: &[[u8; 4]], width: usize, height: usize) -> Vec<[u8; 4]> {
	let mut out = Vec::with_capacity(pixels.len());
	for x in 0..width {
		for y in 0..height {
			out.push(pixels[y * width + x]);
		}
	}
	out
}
