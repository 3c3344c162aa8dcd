//! Lippens-Philips dot diffusion.

use super::diffuse_by_class;
use crate::image::LinearImage;
use crate::matrix::{DotClassMatrix, LippensCoefficients};

/// Dot diffusion with a Lippens class matrix and coefficient set.
///
/// Usually called with [`create_dot_lippens_class_matrix`](crate::matrix::create_dot_lippens_class_matrix)
/// and one of [`LIPPENS_COEFFICIENTS`](crate::matrix::LIPPENS_COEFFICIENTS).
pub fn dot_lippens_dither(
    image: &LinearImage,
    classes: &DotClassMatrix,
    coefficients: &LippensCoefficients,
    out: &mut [u8],
) {
    diffuse_by_class(image, classes, &coefficients.as_diffusion().offsets(), out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{create_dot_lippens_class_matrix, LIPPENS_COEFFICIENTS};
    use crate::output::WHITE;

    #[test]
    fn test_every_coefficient_set_tracks_grey() {
        let classes = create_dot_lippens_class_matrix();
        let image = LinearImage::from_fn(32, 32, |_, _| 0.25).unwrap();
        for (name, coefficients) in LIPPENS_COEFFICIENTS.iter() {
            let mut out = vec![0u8; 1024];
            dot_lippens_dither(&image, &classes, &coefficients, &mut out);
            let frac = out.iter().filter(|&&p| p == WHITE).count() as f64 / 1024.0;
            assert!((frac - 0.25).abs() < 0.1, "{name}: white fraction {frac}");
        }
    }
}
