//! Dot diffusion class and diffusion matrices.
//!
//! A class matrix is tiled over the image and fixes the order in which pixels
//! are processed; a diffusion matrix is the centred footprint through which a
//! processed pixel hands its error to neighbours of a later class.

use super::{rank_by, Registry};
use crate::api::{check_dimensions, check_len, DitherError};

/// Tiled processing-class matrix.
///
/// Classes are non-negative and every class from 0 up to the maximum
/// appears at least once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotClassMatrix {
    width: usize,
    height: usize,
    classes: Vec<i32>,
}

impl DotClassMatrix {
    /// Build a class matrix from row-major class numbers.
    ///
    /// # Example
    ///
    /// ```
    /// use mono_dither::matrix::DotClassMatrix;
    ///
    /// assert!(DotClassMatrix::new(2, 2, &[0, 1, 3, 2]).is_ok());
    /// // class 2 is missing
    /// assert!(DotClassMatrix::new(2, 2, &[0, 1, 3, 3]).is_err());
    /// ```
    pub fn new(width: usize, height: usize, classes: &[i32]) -> Result<Self, DitherError> {
        check_dimensions(width, height)?;
        check_len("class matrix", width, height, classes.len())?;
        if let Some(&c) = classes.iter().find(|&&c| c < 0) {
            return Err(DitherError::InvalidParameter(format!(
                "class matrix: negative class {c}"
            )));
        }
        let max = classes.iter().copied().max().unwrap_or(0) as usize;
        let mut present = vec![false; max + 1];
        for &c in classes {
            present[c as usize] = true;
        }
        if let Some(missing) = present.iter().position(|&p| !p) {
            return Err(DitherError::InvalidParameter(format!(
                "class matrix: class {missing} never appears"
            )));
        }
        Ok(Self::from_parts(width, height, classes.to_vec()))
    }

    pub(crate) fn from_parts(width: usize, height: usize, classes: Vec<i32>) -> Self {
        debug_assert_eq!(classes.len(), width * height);
        Self {
            width,
            height,
            classes,
        }
    }

    /// Class of image pixel `(x, y)`, tiled.
    #[inline]
    pub fn class_at(&self, x: usize, y: usize) -> i32 {
        self.classes[(y % self.height) * self.width + (x % self.width)]
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn classes(&self) -> &[i32] {
        &self.classes
    }
}

/// Centred weight footprint for dot diffusion.
///
/// Both dimensions are odd; the centre weight is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct DotDiffusionMatrix {
    width: usize,
    height: usize,
    weights: Vec<f64>,
}

impl DotDiffusionMatrix {
    /// Build a footprint from row-major weights centred on the processed
    /// pixel.
    ///
    /// Both dimensions must be odd and every weight finite and
    /// non-negative.
    ///
    /// # Example
    ///
    /// ```
    /// use mono_dither::matrix::DotDiffusionMatrix;
    ///
    /// let m = DotDiffusionMatrix::new(3, 1, &[1.0, 0.0, 2.0]).unwrap();
    /// assert_eq!(m.offsets(), vec![(-1, 0, 1.0), (1, 0, 2.0)]);
    /// assert!(DotDiffusionMatrix::new(2, 1, &[1.0, 1.0]).is_err());
    /// ```
    pub fn new(width: usize, height: usize, weights: &[f64]) -> Result<Self, DitherError> {
        check_dimensions(width, height)?;
        check_len("dot diffusion matrix", width, height, weights.len())?;
        if width % 2 == 0 || height % 2 == 0 {
            return Err(DitherError::InvalidParameter(format!(
                "dot diffusion matrix must have odd dimensions, got {width}x{height}"
            )));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(DitherError::InvalidParameter(
                "dot diffusion weights must be finite and non-negative".into(),
            ));
        }
        Ok(Self::from_parts(width, height, weights.to_vec()))
    }

    pub(crate) fn from_parts(width: usize, height: usize, weights: Vec<f64>) -> Self {
        debug_assert_eq!(weights.len(), width * height);
        Self {
            width,
            height,
            weights,
        }
    }

    /// Non-zero `(dx, dy, weight)` offsets around the centre.
    pub fn offsets(&self) -> Vec<(isize, isize, f64)> {
        let (cx, cy) = ((self.width / 2) as isize, (self.height / 2) as isize);
        let mut out = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let (dx, dy) = (x as isize - cx, y as isize - cy);
                let w = self.weights[y * self.width + x];
                if (dx, dy) != (0, 0) && w > 0.0 {
                    out.push((dx, dy, w));
                }
            }
        }
        out
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// Knuth's 8x8 class matrix.
#[rustfmt::skip]
pub(super) const KNUTH: [i32; 64] = [
    34, 48, 40, 32, 29, 15, 23, 31,
    42, 58, 56, 53, 21,  5,  7, 10,
    50, 62, 61, 45, 13,  1,  2, 18,
    38, 46, 54, 37, 25, 17,  9, 26,
    28, 14, 22, 30, 35, 49, 41, 33,
    20,  4,  6, 11, 43, 59, 57, 52,
    12,  0,  3, 19, 51, 63, 60, 44,
    24, 16,  8, 27, 39, 47, 55, 36,
];

fn knuth() -> DotClassMatrix {
    DotClassMatrix::from_parts(8, 8, KNUTH.to_vec())
}

/// 4x4 matrix keeping the relative order of Knuth's top-left quadrant.
fn mini_knuth() -> DotClassMatrix {
    let block: Vec<i32> = (0..16).map(|i| KNUTH[(i / 4) * 8 + i % 4]).collect();
    DotClassMatrix::from_parts(4, 4, rank_by(16, |i| block[i]))
}

/// Cells in the order of a square spiral walked outward from the centre.
fn spiral_order(n: usize) -> Vec<i32> {
    let mut classes = vec![-1i32; n * n];
    let (mut x, mut y) = (((n - 1) / 2) as isize, ((n - 1) / 2) as isize);
    let (mut dx, mut dy) = (1isize, 0isize);
    let mut next = 0;
    let mut run = 1;
    while next < n * n {
        for _ in 0..2 {
            for _ in 0..run {
                if (0..n as isize).contains(&x) && (0..n as isize).contains(&y) {
                    let i = y as usize * n + x as usize;
                    if classes[i] < 0 {
                        classes[i] = next as i32;
                        next += 1;
                    }
                }
                x += dx;
                y += dy;
            }
            (dx, dy) = (-dy, dx);
        }
        run += 1;
    }
    classes
}

fn spiral() -> DotClassMatrix {
    DotClassMatrix::from_parts(8, 8, spiral_order(8))
}

fn spiral_inverted() -> DotClassMatrix {
    let classes = spiral_order(8);
    let max = classes.len() as i32 - 1;
    DotClassMatrix::from_parts(8, 8, classes.into_iter().map(|c| max - c).collect())
}

/// Built-in class matrices by name.
pub static DOT_CLASS_MATRICES: Registry<DotClassMatrix> = registry!("class matrix", {
    "mini_knuth" => mini_knuth,
    "knuth" => knuth,
    "spiral" => spiral,
    "spiral_inverted" => spiral_inverted,
});

fn cross3(diagonal: f64, orthogonal: f64) -> DotDiffusionMatrix {
    #[rustfmt::skip]
    let weights = vec![
        diagonal,   orthogonal, diagonal,
        orthogonal, 0.0,        orthogonal,
        diagonal,   orthogonal, diagonal,
    ];
    DotDiffusionMatrix::from_parts(3, 3, weights)
}

/// Built-in dot diffusion footprints by name.
pub static DOT_DIFFUSION_MATRICES: Registry<DotDiffusionMatrix> =
    registry!("dot diffusion matrix", {
        "default" => || cross3(1.0, 2.0),
        "guoliu8" => || cross3(0.479_72, 1.0),
        "guoliu16" => || cross3(0.384_59, 1.0),
    });
