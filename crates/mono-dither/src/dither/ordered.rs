//! Ordered (threshold matrix) dithering.

use super::{check_output, DitherOptions, Noise};
use crate::image::LinearImage;
use crate::matrix::OrderedMatrix;
use crate::output::{BLACK, WHITE};

/// Compare each pixel against the tiled matrix threshold.
///
/// A pixel is white iff its value is strictly greater than
/// `matrix.threshold(x, y)` plus Gaussian jitter of standard deviation
/// `sigma`. With `sigma == 0` the result is fully deterministic.
pub fn ordered_dither(image: &LinearImage, matrix: &OrderedMatrix, sigma: f64, out: &mut [u8]) {
    ordered_with_options(image, matrix, &DitherOptions::new().sigma(sigma), out);
}

pub(crate) fn ordered_with_options(
    image: &LinearImage,
    matrix: &OrderedMatrix,
    options: &DitherOptions,
    out: &mut [u8],
) {
    check_output(image, out);
    let width = image.width();
    let mut noise = Noise::new(options.seed);
    for (idx, (o, &v)) in out.iter_mut().zip(image.pixels()).enumerate() {
        let t = matrix.threshold(idx % width, idx / width) + noise.gaussian(options.sigma);
        *o = if v > t { WHITE } else { BLACK };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::ORDERED_MATRICES;

    #[test]
    fn test_bayer_gradient_density() {
        // Uniform 50% grey through Bayer 4x4: exactly half the cells are white
        let image = LinearImage::from_fn(8, 8, |_, _| 0.5).unwrap();
        let bayer = ORDERED_MATRICES.get("bayer4x4").unwrap();
        let mut out = vec![0u8; 64];
        ordered_dither(&image, &bayer, 0.0, &mut out);
        let white = out.iter().filter(|&&p| p == WHITE).count();
        assert_eq!(white, 32);
    }

    #[test]
    fn test_extremes() {
        let bayer = ORDERED_MATRICES.get("bayer8x8").unwrap();
        let mut out = vec![0u8; 16];
        let white = LinearImage::from_fn(4, 4, |_, _| 1.0).unwrap();
        ordered_dither(&white, &bayer, 0.0, &mut out);
        assert!(out.iter().all(|&p| p == WHITE));
        let black = LinearImage::new(4, 4).unwrap();
        ordered_dither(&black, &bayer, 0.0, &mut out);
        assert!(out.iter().all(|&p| p == BLACK));
    }

    #[test]
    fn test_jitter_is_seeded() {
        let image = LinearImage::from_fn(16, 16, |x, y| (x + y) as f64 / 30.0).unwrap();
        let bayer = ORDERED_MATRICES.get("bayer4x4").unwrap();
        let options = DitherOptions::new().sigma(0.1).seed(5);
        let mut a = vec![0u8; 256];
        let mut b = vec![0u8; 256];
        ordered_with_options(&image, &bayer, &options, &mut a);
        ordered_with_options(&image, &bayer, &options, &mut b);
        assert_eq!(a, b);
        let mut plain = vec![0u8; 256];
        ordered_dither(&image, &bayer, 0.0, &mut plain);
        assert_ne!(a, plain, "jitter should change some decisions");
    }
}
