//! Ordered dither threshold matrices.
//!
//! A matrix is tiled over the image; the threshold at `(x, y)` is
//! `values[(y mod h) * w + (x mod w)] / divisor`.

use std::sync::OnceLock;

use super::{void_cluster, Registry};
use crate::api::{check_dimensions, check_len, DitherError};
use crate::image::LinearImage;

/// A tiled threshold matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMatrix {
    width: usize,
    height: usize,
    divisor: f64,
    values: Vec<i32>,
}

impl OrderedMatrix {
    /// Build a matrix from row-major integer thresholds.
    ///
    /// # Example
    ///
    /// ```
    /// use mono_dither::OrderedMatrix;
    ///
    /// let m = OrderedMatrix::new(2, 2, 4.0, &[0, 2, 3, 1]).unwrap();
    /// assert_eq!(m.threshold(1, 0), 0.5);
    /// assert_eq!(m.threshold(3, 2), 0.5); // tiles
    /// ```
    pub fn new(
        width: usize,
        height: usize,
        divisor: f64,
        matrix: &[i32],
    ) -> Result<Self, DitherError> {
        check_dimensions(width, height)?;
        check_len("ordered matrix", width, height, matrix.len())?;
        if !(divisor.is_finite() && divisor > 0.0) {
            return Err(DitherError::InvalidDivisor(divisor));
        }
        Ok(Self::from_parts(width, height, divisor, matrix.to_vec()))
    }

    fn from_parts(width: usize, height: usize, divisor: f64, values: Vec<i32>) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            width,
            height,
            divisor,
            values,
        }
    }

    /// Raw threshold value at `(x, y)`, tiled.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> i32 {
        self.values[(y % self.height) * self.width + (x % self.width)]
    }

    /// Normalized threshold at `(x, y)`, tiled.
    #[inline]
    pub fn threshold(&self, x: usize, y: usize) -> f64 {
        self.get(x, y) as f64 / self.divisor
    }

    /// Returns the matrix width.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the matrix height.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the divisor.
    #[inline]
    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    /// Row-major threshold values.
    #[inline]
    pub fn values(&self) -> &[i32] {
        &self.values
    }
}

// ============================================================================
// Generators
// ============================================================================

/// Recursive Bayer index matrix of side `n` (a power of two).
fn bayer_values(n: usize) -> Vec<i32> {
    let mut m = vec![0i32];
    let mut size = 1;
    while size < n {
        let next = size * 2;
        let mut out = vec![0i32; next * next];
        for y in 0..size {
            for x in 0..size {
                let v = 4 * m[y * size + x];
                out[y * next + x] = v;
                out[y * next + x + size] = v + 2;
                out[(y + size) * next + x] = v + 3;
                out[(y + size) * next + x + size] = v + 1;
            }
        }
        m = out;
        size = next;
    }
    m
}

fn bayer(n: usize) -> OrderedMatrix {
    OrderedMatrix::from_parts(n, n, (n * n) as f64, bayer_values(n))
}

fn void_cluster_screen(size: usize, sigma: f64, seed: u64) -> OrderedMatrix {
    let ranks = void_cluster::generate(size, size, sigma, seed);
    let values = ranks.into_iter().map(|r| r as i32).collect();
    OrderedMatrix::from_parts(size, size, (size * size) as f64, values)
}

fn blue_noise_128x128() -> OrderedMatrix {
    static CACHE: OnceLock<OrderedMatrix> = OnceLock::new();
    CACHE
        .get_or_init(|| void_cluster_screen(128, 1.9, 0x5eed))
        .clone()
}

/// Bayer-shaped 2x2 matrix whose spread is controlled by `step`.
///
/// Entry `k` (the Bayer index) becomes `1 + k * step` over a divisor of
/// `2 + 3 * step`: `step == 0` collapses to a plain 0.5 threshold, large
/// steps approach the plain Bayer matrix.
pub fn variable_2x2(step: u32) -> OrderedMatrix {
    variable(2, step)
}

/// 4x4 counterpart of [`variable_2x2`], divisor `2 + 15 * step`.
pub fn variable_4x4(step: u32) -> OrderedMatrix {
    variable(4, step)
}

fn variable(n: usize, step: u32) -> OrderedMatrix {
    let step = step as i32;
    let values = bayer_values(n).into_iter().map(|k| 1 + k * step).collect();
    let divisor = 2.0 + ((n * n - 1) as i32 * step) as f64;
    OrderedMatrix::from_parts(n, n, divisor, values)
}

/// Levels used to store generated floating point thresholds.
const NOISE_LEVELS: i32 = 256;

/// Interleaved gradient noise: `frac(c * frac(a * x + b * y))`.
///
/// The fractional value is quantized to 256 levels.
pub fn interleaved_gradient_noise(
    size: usize,
    a: f64,
    b: f64,
    c: f64,
) -> Result<OrderedMatrix, DitherError> {
    ign(size, a, b, c, 0.0)
}

/// Interleaved gradient noise with the standard rotation triple and a
/// per-frame offset of `5.588238 * step` on both axes.
pub fn interleaved_gradient_noise_step(
    size: usize,
    step: u32,
) -> Result<OrderedMatrix, DitherError> {
    ign(size, 0.067_110_56, 0.005_837_15, 52.982_918_9, 5.588_238 * step as f64)
}

fn ign(size: usize, a: f64, b: f64, c: f64, offset: f64) -> Result<OrderedMatrix, DitherError> {
    check_dimensions(size, size)?;
    let mut values = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let (x, y) = (x as f64 + offset, y as f64 + offset);
            let v = (c * (a * x + b * y).fract()).fract();
            values.push(((v * NOISE_LEVELS as f64) as i32).clamp(0, NOISE_LEVELS - 1));
        }
    }
    Ok(OrderedMatrix::from_parts(size, size, NOISE_LEVELS as f64, values))
}

/// Use an image (for example a blue-noise texture) as a threshold matrix.
///
/// Each pixel becomes `round(value * 255)` over a divisor of 256.
pub fn matrix_from_image(image: &LinearImage) -> OrderedMatrix {
    let values = image
        .pixels()
        .iter()
        .map(|&v| (v * 255.0).round() as i32)
        .collect();
    OrderedMatrix::from_parts(image.width(), image.height(), 256.0, values)
}

// ============================================================================
// Static tables
// ============================================================================

const BAYER_3X3: [i32; 9] = [0, 7, 3, 6, 5, 2, 4, 1, 8];

/// Orthogonal halftone screens.
#[rustfmt::skip]
const MAGIC_4X4: [i32; 16] = [
     7, 13, 11,  4,
    12, 16, 14,  8,
    10, 15,  6,  2,
     5,  9,  3,  1,
];

#[rustfmt::skip]
const MAGIC_6X6: [i32; 36] = [
     7, 17, 27, 14,  9,  4,
    21, 29, 33, 31, 18, 11,
    24, 32, 36, 34, 25, 22,
    19, 30, 35, 28, 20, 10,
     8, 15, 26, 16,  6,  2,
     5, 13, 23, 12,  3,  1,
];

#[rustfmt::skip]
const MAGIC_8X8: [i32; 64] = [
     7, 21, 33, 43, 36, 19,  9,  4,
    16, 27, 51, 55, 49, 29, 14, 11,
    31, 47, 57, 61, 59, 45, 35, 23,
    41, 53, 60, 64, 62, 52, 40, 38,
    37, 44, 58, 63, 56, 46, 30, 22,
    15, 28, 48, 54, 50, 26, 17, 10,
     8, 18, 34, 42, 32, 24, 13,  6,
     3,  5, 25, 39, 20, 12,  2,  1,
];

/// 45 degree halftone screens (two dots per cell).
#[rustfmt::skip]
const MAGIC_4X4_45: [i32; 16] = [
    4, 2, 7, 5,
    3, 1, 8, 6,
    7, 5, 4, 2,
    8, 6, 3, 1,
];

#[rustfmt::skip]
const MAGIC_6X6_45: [i32; 36] = [
    14, 13, 10,  8,  2,  3,
    16, 18, 12,  7,  1,  4,
    15, 17, 11,  9,  6,  5,
     8,  2,  3, 14, 13, 10,
     7,  1,  4, 16, 18, 12,
     9,  6,  5, 15, 17, 11,
];

#[rustfmt::skip]
const MAGIC_8X8_45: [i32; 64] = [
    13,  7,  8, 14, 17, 21, 22, 18,
     6,  1,  3,  9, 28, 31, 29, 23,
     5,  2,  4, 10, 27, 32, 30, 24,
    16, 12, 11, 15, 20, 26, 25, 19,
    17, 21, 22, 18, 13,  7,  8, 14,
    28, 31, 29, 23,  6,  1,  3,  9,
    27, 32, 30, 24,  5,  2,  4, 10,
    20, 26, 25, 19, 16, 12, 11, 15,
];

/// Circular dot screens.
#[rustfmt::skip]
const MAGIC_5X5_CIRCLE: [i32; 25] = [
     1, 21, 16, 15,  4,
     5, 17, 20, 19, 14,
     6, 13, 25, 24, 12,
     7, 18, 22, 23, 11,
     2,  8,  9, 10,  3,
];

#[rustfmt::skip]
const MAGIC_6X6_CIRCLE: [i32; 36] = [
     1,  5, 14, 13, 12,  4,
     6, 22, 28, 27, 21, 11,
    15, 29, 35, 34, 33, 20,
    16, 30, 36, 32, 26, 19,
     7, 23, 31, 25, 24, 10,
     2,  8, 17, 18,  9,  3,
];

#[rustfmt::skip]
const MAGIC_7X7_CIRCLE: [i32; 49] = [
     3,  9, 18, 28, 17,  8,  2,
    10, 24, 33, 39, 32, 23,  7,
    19, 34, 44, 48, 43, 31, 16,
    25, 40, 45, 49, 47, 38, 27,
    20, 35, 41, 46, 42, 29, 15,
    11, 21, 36, 37, 30, 22,  6,
     4, 12, 13, 26, 14,  5,  1,
];

/// Ulichney's 6x6 screens from *Digital Halftoning*.
#[rustfmt::skip]
const CENTRAL_WHITE_POINT: [i32; 36] = [
    34, 25, 21, 17, 29, 33,
    30, 13,  9,  5, 12, 24,
    18,  6,  1,  0,  8, 20,
    22, 10,  2,  3,  4, 16,
    26, 14,  7, 11, 15, 28,
    35, 31, 19, 23, 27, 32,
];

#[rustfmt::skip]
const BALANCED_CENTERED_POINT: [i32; 36] = [
    30, 22, 16, 21, 33, 35,
    24, 11,  7,  9, 26, 28,
    13,  5,  0,  2, 14, 19,
    15,  3,  1,  4, 12, 18,
    27,  8,  6, 10, 25, 29,
    32, 20, 23, 17, 31, 34,
];

#[rustfmt::skip]
const ULICHNEY_CLUSTERED_DOT: [i32; 36] = [
    34, 29, 17, 21, 30, 35,
    28, 14,  9, 16, 20, 31,
    13,  8,  4,  5, 15, 19,
    12,  3,  0,  1, 10, 18,
    27,  7,  2,  6, 23, 24,
    33, 26, 11, 22, 25, 32,
];

/// Two balanced centred points per cell on a 45 degree diagonal; every
/// level appears twice.
#[rustfmt::skip]
const DIAGONAL_ORDERED: [i32; 64] = [
    13,  9,  5, 12, 18, 22, 26, 19,
     6,  1,  0,  8, 25, 30, 31, 23,
    10,  2,  3,  4, 21, 29, 28, 27,
    14,  7, 11, 15, 17, 24, 20, 16,
    18, 22, 26, 19, 13,  9,  5, 12,
    25, 30, 31, 23,  6,  1,  0,  8,
    21, 29, 28, 27, 10,  2,  3,  4,
    17, 24, 20, 16, 14,  7, 11, 15,
];

fn table(width: usize, height: usize, divisor: f64, values: &[i32]) -> OrderedMatrix {
    OrderedMatrix::from_parts(width, height, divisor, values.to_vec())
}

/// Built-in ordered dither matrices by name.
pub static ORDERED_MATRICES: Registry<OrderedMatrix> = registry!("ordered matrix", {
    "bayer2x2" => || bayer(2),
    "bayer3x3" => || table(3, 3, 9.0, &BAYER_3X3),
    "bayer4x4" => || bayer(4),
    "bayer8x8" => || bayer(8),
    "bayer16x16" => || bayer(16),
    "bayer32x32" => || bayer(32),
    "blue_noise_128x128" => blue_noise_128x128,
    "magic4x4" => || table(4, 4, 17.0, &MAGIC_4X4),
    "magic6x6" => || table(6, 6, 37.0, &MAGIC_6X6),
    "magic8x8" => || table(8, 8, 65.0, &MAGIC_8X8),
    "magic4x4_45" => || table(4, 4, 9.0, &MAGIC_4X4_45),
    "magic6x6_45" => || table(6, 6, 19.0, &MAGIC_6X6_45),
    "magic8x8_45" => || table(8, 8, 33.0, &MAGIC_8X8_45),
    "magic5x5_circle" => || table(5, 5, 26.0, &MAGIC_5X5_CIRCLE),
    "magic6x6_circle" => || table(6, 6, 37.0, &MAGIC_6X6_CIRCLE),
    "magic7x7_circle" => || table(7, 7, 50.0, &MAGIC_7X7_CIRCLE),
    "central_white_point" => || table(6, 6, 36.0, &CENTRAL_WHITE_POINT),
    "balanced_centered_point" => || table(6, 6, 36.0, &BALANCED_CENTERED_POINT),
    "diagonal_ordered" => || table(8, 8, 32.0, &DIAGONAL_ORDERED),
    "ulichney_clustered_dot" => || table(6, 6, 36.0, &ULICHNEY_CLUSTERED_DOT),
});
