//! Lippens-Philips dot diffusion tables.

use super::dot::{DotClassMatrix, DotDiffusionMatrix, KNUTH};
use super::Registry;
use crate::api::DitherError;

/// Quadrant order of the four Knuth tiles.
const QUADRANTS: [i32; 4] = [0, 2, 3, 1];

/// 16x16 class matrix used by Lippens-Philips dot diffusion.
///
/// Four copies of Knuth's 8x8 matrix are interleaved: the class of `(x, y)`
/// is `4 * knuth(x mod 8, y mod 8) + q`, where `q` orders the quadrants
/// diagonally. Every class appears exactly once and, as in Knuth's matrix,
/// few pixels end up with no later neighbour.
pub fn create_dot_lippens_class_matrix() -> DotClassMatrix {
    let classes = (0..256)
        .map(|i| {
            let (x, y) = (i % 16, i / 16);
            4 * KNUTH[(y % 8) * 8 + x % 8] + QUADRANTS[(y / 8) * 2 + x / 8]
        })
        .collect();
    DotClassMatrix::from_parts(16, 16, classes)
}

/// Centred integer error weights for Lippens-Philips dot diffusion.
#[derive(Debug, Clone, PartialEq)]
pub struct LippensCoefficients {
    coefficients: Vec<i32>,
    matrix: DotDiffusionMatrix,
}

impl LippensCoefficients {
    /// Odd-sized, non-negative, row-major weights. The centre is ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use mono_dither::matrix::LippensCoefficients;
    ///
    /// let c = LippensCoefficients::new(3, 1, &[1, 0, 1]).unwrap();
    /// assert_eq!(c.as_diffusion().offsets().len(), 2);
    /// assert!(LippensCoefficients::new(3, 1, &[1, 0, -1]).is_err());
    /// ```
    pub fn new(width: usize, height: usize, coefficients: &[i32]) -> Result<Self, DitherError> {
        if let Some(&c) = coefficients.iter().find(|&&c| c < 0) {
            return Err(DitherError::InvalidParameter(format!(
                "lippens coefficients: negative weight {c}"
            )));
        }
        let weights: Vec<f64> = coefficients.iter().map(|&c| c as f64).collect();
        Ok(Self {
            coefficients: coefficients.to_vec(),
            matrix: DotDiffusionMatrix::new(width, height, &weights)?,
        })
    }

    /// The weights as a dot diffusion footprint.
    #[inline]
    pub fn as_diffusion(&self) -> &DotDiffusionMatrix {
        &self.matrix
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.matrix.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.matrix.height()
    }

    #[inline]
    pub fn coefficients(&self) -> &[i32] {
        &self.coefficients
    }
}

fn coefficients(width: usize, height: usize, coefficients: &[i32]) -> LippensCoefficients {
    let weights = coefficients.iter().map(|&c| c as f64).collect();
    LippensCoefficients {
        coefficients: coefficients.to_vec(),
        matrix: DotDiffusionMatrix::from_parts(width, height, weights),
    }
}

#[rustfmt::skip]
const COEFFICIENTS_1: [i32; 9] = [
    0, 1, 0,
    1, 0, 1,
    0, 1, 0,
];

#[rustfmt::skip]
const COEFFICIENTS_2: [i32; 25] = [
    0, 1, 2, 1, 0,
    1, 4, 8, 4, 1,
    2, 8, 0, 8, 2,
    1, 4, 8, 4, 1,
    0, 1, 2, 1, 0,
];

#[rustfmt::skip]
const COEFFICIENTS_3: [i32; 25] = [
    1, 2, 3, 2, 1,
    2, 4, 6, 4, 2,
    3, 6, 0, 6, 3,
    2, 4, 6, 4, 2,
    1, 2, 3, 2, 1,
];

/// Built-in Lippens coefficient sets by name.
pub static LIPPENS_COEFFICIENTS: Registry<LippensCoefficients> =
    registry!("lippens coefficient set", {
        "coefficients1" => || coefficients(3, 3, &COEFFICIENTS_1),
        "coefficients2" => || coefficients(5, 5, &COEFFICIENTS_2),
        "coefficients3" => || coefficients(5, 5, &COEFFICIENTS_3),
    });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_matrix_is_permutation() {
        let m = create_dot_lippens_class_matrix();
        assert_eq!((m.width(), m.height()), (16, 16));
        let mut classes = m.classes().to_vec();
        classes.sort_unstable();
        assert_eq!(classes, (0..256).collect::<Vec<_>>());
    }

    #[test]
    fn test_builtin_sets_validate() {
        for (name, c) in LIPPENS_COEFFICIENTS.iter() {
            let rebuilt = LippensCoefficients::new(c.width(), c.height(), c.coefficients());
            assert_eq!(rebuilt.as_ref(), Ok(&c), "{name}");
            assert!(!c.as_diffusion().offsets().is_empty(), "{name}: empty footprint");
        }
    }

    #[test]
    fn test_rejects_even_size() {
        assert!(LippensCoefficients::new(4, 4, &[1; 16]).is_err());
    }
}
