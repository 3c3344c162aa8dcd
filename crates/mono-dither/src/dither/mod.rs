//! Dithering engines.
//!
//! Every engine reads a [`LinearImage`] and writes one byte per pixel,
//! [`BLACK`] or [`WHITE`], into a caller-provided buffer of
//! `width * height` bytes in row-major order.
//!
//! # Engines
//!
//! | Engine | Entry point | Scan order |
//! |--------|-------------|------------|
//! | Threshold | [`threshold_dither`], [`auto_threshold`] | per pixel |
//! | Ordered | [`ordered_dither`] | per pixel |
//! | Error diffusion | [`error_diffusion_dither`] | raster, optionally serpentine |
//! | Variable coefficients | [`variable_error_diffusion_dither`] | raster, optionally serpentine |
//! | Dot diffusion | [`dot_diffusion_dither`] | class order |
//! | Direct binary search | [`dbs_dither`], [`Dbs`] | repeated raster passes |
//! | Kacker-Allebach | [`kallebach_dither`] | per 8x8 block |
//! | Riemersma | [`riemersma_dither`] | space-filling curve |
//! | Pattern | [`pattern_dither`] | per block |
//! | Grid | [`grid_dither`] | per cell |
//! | Lippens-Philips | [`dot_lippens_dither`] | class order |
//!
//! # Preconditions
//!
//! The output buffer length must equal `image.len()`. This is checked with
//! `debug_assert!` only.
//!
//! # Example
//!
//! ```
//! use mono_dither::dither::ordered_dither;
//! use mono_dither::matrix::ORDERED_MATRICES;
//! use mono_dither::LinearImage;
//!
//! let image = LinearImage::from_luma(2, 2, &[0.0, 1.0, 1.0, 0.0]).unwrap();
//! let bayer = ORDERED_MATRICES.get("bayer2x2").unwrap();
//! let mut out = vec![0u8; 4];
//! ordered_dither(&image, &bayer, 0.0, &mut out);
//! assert_eq!(out, [0, 255, 255, 0]);
//! ```

mod dbs;
mod dot_diffusion;
mod error_diffusion;
mod grid;
mod kallebach;
mod lippens;
mod options;
mod ordered;
mod pattern;
mod riemersma;
mod threshold;
mod variable;

pub use dbs::{dbs_dither, Dbs};
pub use dot_diffusion::dot_diffusion_dither;
pub use error_diffusion::error_diffusion_dither;
pub use grid::grid_dither;
pub use kallebach::kallebach_dither;
pub use lippens::dot_lippens_dither;
pub use options::{DitherOptions, DEFAULT_SEED};
pub use ordered::ordered_dither;
pub use pattern::pattern_dither;
pub use riemersma::riemersma_dither;
pub use threshold::{auto_threshold, threshold_dither};
pub use variable::{variable_error_diffusion_dither, VariableKind};

pub(crate) use dot_diffusion::diffuse_by_class;
pub(crate) use error_diffusion::diffuse;
pub(crate) use kallebach::kallebach_with_seed;
pub(crate) use ordered::ordered_with_options;
pub(crate) use threshold::threshold_with_seed;
pub(crate) use variable::variable_with_options;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::image::LinearImage;
use crate::output::{BLACK, WHITE};

/// Threshold separating black from white in linear light.
pub(crate) const MIDPOINT: f64 = 0.5;

/// Quantize a value: white iff strictly above the midpoint.
#[inline]
pub(crate) fn quantize(value: f64) -> (u8, f64) {
    if value > MIDPOINT {
        (WHITE, 1.0)
    } else {
        (BLACK, 0.0)
    }
}

#[inline]
pub(crate) fn check_output(image: &LinearImage, out: &[u8]) {
    debug_assert_eq!(
        out.len(),
        image.len(),
        "output length ({}) must match image size ({}x{})",
        out.len(),
        image.width(),
        image.height(),
    );
}

/// Seeded noise source shared by the jittered engines.
pub(crate) struct Noise {
    rng: StdRng,
}

impl Noise {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform sample in `[0, 1)`.
    #[inline]
    pub(crate) fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform index in `0..n`.
    #[inline]
    pub(crate) fn index(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    /// Gaussian sample with standard deviation `sigma` (Box-Muller).
    ///
    /// Draws nothing when `sigma` is zero, so unjittered runs leave the
    /// generator untouched.
    #[inline]
    pub(crate) fn gaussian(&mut self, sigma: f64) -> f64 {
        if sigma == 0.0 {
            return 0.0;
        }
        let u1 = 1.0 - self.uniform();
        let u2 = self.uniform();
        sigma * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

/// Error buffer for efficient error diffusion.
///
/// Manages a sliding window of error rows, storing only the rows that
/// the diffusion kernel can reach (determined by `max_dy`). This avoids
/// allocating a full-image error buffer.
///
/// # Usage Pattern
///
/// 1. Create buffer with `new(width, row_depth)`
/// 2. For each row:
///    a. Read accumulated error with `get_accumulated(x)`
///    b. After processing pixel, distribute error with `add_error(x, dy, error)`
///    c. After row complete, call `advance_row()`
#[derive(Debug)]
pub(crate) struct ErrorBuffer {
    /// Error rows: rows[0] is current row, rows[1] is next, etc.
    rows: Vec<Vec<f64>>,
    width: usize,
}

impl ErrorBuffer {
    /// `row_depth` is the kernel's `max_dy + 1`.
    pub(crate) fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![0.0; width]).collect(),
            width,
        }
    }

    #[inline]
    pub(crate) fn get_accumulated(&self, x: usize) -> f64 {
        self.rows[0][x]
    }

    /// Add error to a future pixel. Out-of-range targets are dropped.
    #[inline]
    pub(crate) fn add_error(&mut self, x: usize, row_offset: usize, error: f64) {
        if x < self.width && row_offset < self.rows.len() {
            self.rows[row_offset][x] += error;
        }
    }

    /// Rotate the window down one row and clear the new last row.
    pub(crate) fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill(0.0);
        }
    }
}
