//! Error diffusion kernel definitions.
//!
//! Each kernel specifies how quantization error is distributed to
//! neighbouring pixels that the raster scan has not reached yet.

use std::borrow::Cow;

use super::Registry;
use crate::api::{check_dimensions, check_len, DitherError};

/// An error diffusion kernel.
///
/// Each entry is a `(dx, dy, weight)` triple relative to the current pixel;
/// a neighbour receives `error * weight / divisor`. Entries always lie
/// strictly ahead of the scan: `dy > 0`, or `dy == 0` and `dx > 0`.
///
/// # Error Propagation
///
/// The total error propagated is `sum(weights) / divisor` and never exceeds
/// 1.0. Most kernels propagate 100%; Atkinson deliberately drops 25%.
///
/// # Buffer Sizing
///
/// The `max_dy` field indicates how many rows ahead the kernel reaches,
/// which determines the error buffer depth needed: `max_dy + 1` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffusionKernel {
    entries: Cow<'static, [(i32, i32, i32)]>,
    divisor: f64,
    max_dy: usize,
}

impl DiffusionKernel {
    /// Build a kernel from a row-major `width x height` weight grid.
    ///
    /// The current pixel sits in the first row, immediately left of the
    /// first non-zero weight. A first row without weights puts the current
    /// pixel in the centre column.
    ///
    /// # Example
    ///
    /// ```
    /// use mono_dither::DiffusionKernel;
    ///
    /// // Floyd-Steinberg written out as a grid
    /// let kernel = DiffusionKernel::new(3, 2, 16.0, &[0, 0, 7, 3, 5, 1]).unwrap();
    /// assert_eq!(kernel.entries(), &[(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)]);
    /// ```
    pub fn new(
        width: usize,
        height: usize,
        divisor: f64,
        matrix: &[i32],
    ) -> Result<Self, DitherError> {
        check_dimensions(width, height)?;
        check_len("diffusion kernel", width, height, matrix.len())?;
        if !(divisor.is_finite() && divisor > 0.0) {
            return Err(DitherError::InvalidDivisor(divisor));
        }
        if matrix.iter().any(|&w| w < 0) {
            return Err(DitherError::InvalidParameter(
                "diffusion kernel weights must not be negative".into(),
            ));
        }

        let current = match matrix[..width].iter().position(|&w| w != 0) {
            Some(0) => {
                return Err(DitherError::InvalidParameter(
                    "first kernel row must leave room for the current pixel".into(),
                ))
            }
            Some(first) => first - 1,
            None => width / 2,
        };

        let mut entries = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let weight = matrix[y * width + x];
                if weight != 0 {
                    entries.push((x as i32 - current as i32, y as i32, weight));
                }
            }
        }

        let sum: i64 = entries.iter().map(|&(_, _, w)| w as i64).sum();
        if sum as f64 > divisor + 1e-9 {
            return Err(DitherError::InvalidParameter(format!(
                "kernel weights sum to {sum}, more than divisor {divisor}"
            )));
        }

        let max_dy = entries.iter().map(|&(_, dy, _)| dy as usize).max().unwrap_or(0);
        Ok(Self {
            entries: Cow::Owned(entries),
            divisor,
            max_dy,
        })
    }

    /// `(dx, dy, weight)` entries.
    #[inline]
    pub fn entries(&self) -> &[(i32, i32, i32)] {
        &self.entries
    }

    /// Divisor normalizing the weights.
    #[inline]
    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    /// Rows reached below the current one.
    #[inline]
    pub fn max_dy(&self) -> usize {
        self.max_dy
    }

    /// Fraction of the error propagated in total.
    pub fn propagation(&self) -> f64 {
        self.entries.iter().map(|&(_, _, w)| w as f64).sum::<f64>() / self.divisor
    }
}

macro_rules! kernel {
    ($divisor:expr, $max_dy:expr, [$($entry:expr),* $(,)?]) => {
        DiffusionKernel {
            entries: Cow::Borrowed(&[$($entry),*]),
            divisor: $divisor,
            max_dy: $max_dy,
        }
    };
}

/// Xot kernel.
///
/// ```text
///        X   6   2
///    1   3   5   3   1
///        1   2   1
/// ```
pub const XOT: DiffusionKernel = kernel!(
    25.0,
    2,
    [
        (1, 0, 6),
        (2, 0, 2),
        (-2, 1, 1),
        (-1, 1, 3),
        (0, 1, 5),
        (1, 1, 3),
        (2, 1, 1),
        (-1, 2, 1),
        (0, 2, 2),
        (1, 2, 1),
    ]
);

/// Everything goes to the bottom-right neighbour.
pub const DIAGONAL: DiffusionKernel = kernel!(1.0, 1, [(1, 1, 1)]);

/// Floyd-Steinberg dithering kernel.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: DiffusionKernel =
    kernel!(16.0, 1, [(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)]);

/// Shiau-Fan kernel (4 neighbours).
///
/// ```text
///            X   4
///    1   1   2
/// ```
pub const SHIAUFAN3: DiffusionKernel =
    kernel!(8.0, 1, [(1, 0, 4), (-2, 1, 1), (-1, 1, 1), (0, 1, 2)]);

/// Shiau-Fan kernel (5 neighbours).
///
/// ```text
///                X   8
///    1   1   2   4
/// ```
pub const SHIAUFAN2: DiffusionKernel = kernel!(
    16.0,
    1,
    [(1, 0, 8), (-3, 1, 1), (-2, 1, 1), (-1, 1, 2), (0, 1, 4)]
);

/// Shiau-Fan kernel, centred variant.
///
/// ```text
///        X   4
///    1   2   1
/// ```
pub const SHIAUFAN1: DiffusionKernel =
    kernel!(8.0, 1, [(1, 0, 4), (-1, 1, 1), (0, 1, 2), (1, 1, 1)]);

/// Stucki kernel.
///
/// ```text
///            X   8   4
///    2   4   8   4   2
///    1   2   4   2   1
/// ```
pub const STUCKI: DiffusionKernel = kernel!(
    42.0,
    2,
    [
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
        (-2, 2, 1),
        (-1, 2, 2),
        (0, 2, 4),
        (1, 2, 2),
        (2, 2, 1),
    ]
);

/// One-dimensional diffusion: all error to the right.
pub const DIFFUSION_1D: DiffusionKernel = kernel!(1.0, 0, [(1, 0, 1)]);

/// Two-dimensional diffusion: half right, half down.
pub const DIFFUSION_2D: DiffusionKernel = kernel!(2.0, 1, [(1, 0, 1), (0, 1, 1)]);

/// "Fake" Floyd-Steinberg.
///
/// ```text
///    X   3
///    3   2
/// ```
pub const FAKE_FLOYD_STEINBERG: DiffusionKernel =
    kernel!(8.0, 1, [(1, 0, 3), (0, 1, 3), (1, 1, 2)]);

/// Jarvis-Judice-Ninke dithering kernel.
///
/// ```text
///            X   7   5
///    3   5   7   5   3
///    1   3   5   3   1
/// ```
pub const JARVIS_JUDICE_NINKE: DiffusionKernel = kernel!(
    48.0,
    2,
    [
        (1, 0, 7),
        (2, 0, 5),
        (-2, 1, 3),
        (-1, 1, 5),
        (0, 1, 7),
        (1, 1, 5),
        (2, 1, 3),
        (-2, 2, 1),
        (-1, 2, 3),
        (0, 2, 5),
        (1, 2, 3),
        (2, 2, 1),
    ]
);

/// Atkinson dithering kernel.
///
/// Distributes error to 6 neighbours with 75% total propagation (6/8).
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: DiffusionKernel = kernel!(
    8.0,
    2,
    [
        (1, 0, 1),
        (2, 0, 1),
        (-1, 1, 1),
        (0, 1, 1),
        (1, 1, 1),
        (0, 2, 1),
    ]
);

/// Burkes kernel.
///
/// ```text
///            X   8   4
///    2   4   8   4   2
/// ```
pub const BURKES: DiffusionKernel = kernel!(
    32.0,
    1,
    [
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
    ]
);

/// Sierra (full/Sierra-3) kernel.
///
/// ```text
///            X   5   3
///    2   4   5   4   2
///        2   3   2
/// ```
pub const SIERRA_3: DiffusionKernel = kernel!(
    32.0,
    2,
    [
        (1, 0, 5),
        (2, 0, 3),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 5),
        (1, 1, 4),
        (2, 1, 2),
        (-1, 2, 2),
        (0, 2, 3),
        (1, 2, 2),
    ]
);

/// Sierra two-row kernel.
///
/// ```text
///            X   4   3
///    1   2   3   2   1
/// ```
pub const SIERRA_2ROW: DiffusionKernel = kernel!(
    16.0,
    1,
    [
        (1, 0, 4),
        (2, 0, 3),
        (-2, 1, 1),
        (-1, 1, 2),
        (0, 1, 3),
        (1, 1, 2),
        (2, 1, 1),
    ]
);

/// Sierra Lite kernel.
///
/// ```text
///        X   2
///    1   1
/// ```
pub const SIERRA_LITE: DiffusionKernel = kernel!(4.0, 1, [(1, 0, 2), (-1, 1, 1), (0, 1, 1)]);

/// Steve Pigeon kernel.
///
/// ```text
///            X   2   1
///    1   2   2   2   1
///    1       1       1
/// ```
pub const STEVE_PIGEON: DiffusionKernel = kernel!(
    14.0,
    2,
    [
        (1, 0, 2),
        (2, 0, 1),
        (-2, 1, 1),
        (-1, 1, 2),
        (0, 1, 2),
        (1, 1, 2),
        (2, 1, 1),
        (-2, 2, 1),
        (0, 2, 1),
        (2, 2, 1),
    ]
);

/// Robert Kist kernel.
///
/// ```text
///            X   7   2
///    1   3   5   3   1
///            2
/// ```
pub const ROBERT_KIST: DiffusionKernel = kernel!(
    24.0,
    2,
    [
        (1, 0, 7),
        (2, 0, 2),
        (-2, 1, 1),
        (-1, 1, 3),
        (0, 1, 5),
        (1, 1, 3),
        (2, 1, 1),
        (0, 2, 2),
    ]
);

/// Stevenson-Arce kernel, designed for hexagonal grids.
///
/// ```text
///                    X       32
///     12      26      30      16
///         12      26      12
///      5      12      12       5
/// ```
pub const STEVENSON_ARCE: DiffusionKernel = kernel!(
    200.0,
    3,
    [
        (2, 0, 32),
        (-3, 1, 12),
        (-1, 1, 26),
        (1, 1, 30),
        (3, 1, 16),
        (-2, 2, 12),
        (0, 2, 26),
        (2, 2, 12),
        (-3, 3, 5),
        (-1, 3, 12),
        (1, 3, 12),
        (3, 3, 5),
    ]
);

/// Built-in error diffusion kernels by name.
pub static DIFFUSION_KERNELS: Registry<DiffusionKernel> = registry!("diffusion kernel", {
    "xot" => || XOT,
    "diagonal" => || DIAGONAL,
    "floyd_steinberg" => || FLOYD_STEINBERG,
    "shiaufan3" => || SHIAUFAN3,
    "shiaufan2" => || SHIAUFAN2,
    "shiaufan1" => || SHIAUFAN1,
    "stucki" => || STUCKI,
    "diffusion_1d" => || DIFFUSION_1D,
    "diffusion_2d" => || DIFFUSION_2D,
    "fake_floyd_steinberg" => || FAKE_FLOYD_STEINBERG,
    "jarvis_judice_ninke" => || JARVIS_JUDICE_NINKE,
    "atkinson" => || ATKINSON,
    "burkes" => || BURKES,
    "sierra_3" => || SIERRA_3,
    "sierra_2row" => || SIERRA_2ROW,
    "sierra_lite" => || SIERRA_LITE,
    "steve_pigeon" => || STEVE_PIGEON,
    "robert_kist" => || ROBERT_KIST,
    "stevenson_arce" => || STEVENSON_ARCE,
});

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_sum(kernel: &DiffusionKernel) -> i32 {
        kernel.entries().iter().map(|&(_, _, w)| w).sum()
    }

    #[test]
    fn test_floyd_steinberg_propagation_100_percent() {
        assert_eq!(weight_sum(&FLOYD_STEINBERG), 16, "FS weights should sum to 16");
        assert_eq!(FLOYD_STEINBERG.divisor(), 16.0);
    }

    #[test]
    fn test_atkinson_propagation_75_percent() {
        assert_eq!(weight_sum(&ATKINSON), 6, "Atkinson weights should sum to 6");
        assert!((ATKINSON.propagation() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_published_divisors() {
        let expected = [
            ("jarvis_judice_ninke", 48),
            ("stucki", 42),
            ("burkes", 32),
            ("sierra_3", 32),
            ("sierra_2row", 16),
            ("sierra_lite", 4),
            ("stevenson_arce", 200),
            ("steve_pigeon", 14),
        ];
        for (name, sum) in expected {
            let kernel = DIFFUSION_KERNELS.get(name).unwrap();
            assert_eq!(weight_sum(&kernel), sum, "{name} weight sum");
            assert_eq!(kernel.divisor(), sum as f64, "{name} divisor");
        }
    }

    #[test]
    fn test_all_kernels_energy_conserving_and_ahead() {
        assert_eq!(DIFFUSION_KERNELS.len(), 19);
        for (name, kernel) in DIFFUSION_KERNELS.iter() {
            assert!(kernel.divisor() > 0.0, "{name}: divisor must be positive");
            assert!(
                kernel.propagation() <= 1.0 + 1e-12,
                "{name}: propagates {} of the error",
                kernel.propagation()
            );
            for &(dx, dy, w) in kernel.entries() {
                assert!(w > 0, "{name}: zero weight entry");
                assert!(
                    dy > 0 || (dy == 0 && dx > 0),
                    "{name}: entry ({dx}, {dy}) is not ahead of the scan"
                );
            }
        }
    }

    #[test]
    fn test_max_dy_matches_entries() {
        for (name, kernel) in DIFFUSION_KERNELS.iter() {
            let actual = kernel
                .entries()
                .iter()
                .map(|&(_, dy, _)| dy as usize)
                .max()
                .unwrap();
            assert_eq!(actual, kernel.max_dy(), "{name} max_dy mismatch");
        }
        assert_eq!(STEVENSON_ARCE.max_dy(), 3, "Stevenson-Arce reaches 3 rows ahead");
    }

    #[test]
    fn test_grid_constructor_matches_jjn() {
        #[rustfmt::skip]
        let grid = [
            0, 0, 0, 7, 5,
            3, 5, 7, 5, 3,
            1, 3, 5, 3, 1,
        ];
        let kernel = DiffusionKernel::new(5, 3, 48.0, &grid).unwrap();
        assert_eq!(kernel.entries(), JARVIS_JUDICE_NINKE.entries());
        assert_eq!(kernel.max_dy(), 2);
    }

    #[test]
    fn test_grid_constructor_without_first_row_weights() {
        // Current pixel falls back to the centre column
        let kernel = DiffusionKernel::new(3, 2, 1.0, &[0, 0, 0, 0, 0, 1]).unwrap();
        assert_eq!(kernel.entries(), &[(1, 1, 1)]);
    }

    #[test]
    fn test_grid_constructor_rejects_bad_input() {
        assert!(matches!(
            DiffusionKernel::new(2, 1, 0.0, &[0, 1]),
            Err(DitherError::InvalidDivisor(_))
        ));
        assert!(matches!(
            DiffusionKernel::new(0, 1, 1.0, &[]),
            Err(DitherError::InvalidDimension { .. })
        ));
        assert!(matches!(
            DiffusionKernel::new(2, 1, 1.0, &[1, 1]),
            Err(DitherError::InvalidParameter(_))
        ));
        // 9 / 8 would amplify the error
        assert!(matches!(
            DiffusionKernel::new(2, 2, 8.0, &[0, 5, 2, 2]),
            Err(DitherError::InvalidParameter(_))
        ));
    }
}
