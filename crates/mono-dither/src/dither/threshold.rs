//! Fixed and automatic thresholding.

use super::{check_output, DitherOptions, Noise, MIDPOINT};
use crate::image::LinearImage;
use crate::output::{BLACK, WHITE};

const MAX_ITERATIONS: usize = 100;
const CONVERGENCE: f64 = 1e-6;

/// Estimate a global threshold with the isodata iteration.
///
/// Starts at the mean intensity and repeatedly moves to the midpoint of the
/// means below and above the current threshold until it settles. An image
/// with a single intensity has nothing to split and gets the midpoint `0.5`.
///
/// # Example
///
/// ```
/// use mono_dither::dither::auto_threshold;
/// use mono_dither::LinearImage;
///
/// let image = LinearImage::from_luma(4, 1, &[0.1, 0.1, 0.9, 0.9]).unwrap();
/// let t = auto_threshold(&image);
/// assert!(t > 0.1 && t < 0.9);
/// ```
pub fn auto_threshold(image: &LinearImage) -> f64 {
    let pixels = image.pixels();
    let mut t = image.mean();
    for _ in 0..MAX_ITERATIONS {
        let (mut below, mut below_n, mut above, mut above_n) = (0.0, 0usize, 0.0, 0usize);
        for &v in pixels {
            if v <= t {
                below += v;
                below_n += 1;
            } else {
                above += v;
                above_n += 1;
            }
        }
        if below_n == 0 || above_n == 0 {
            t = MIDPOINT;
            break;
        }
        let next = (below / below_n as f64 + above / above_n as f64) / 2.0;
        let done = (next - t).abs() < CONVERGENCE;
        t = next;
        if done {
            break;
        }
    }
    tracing::debug!(threshold = t, "auto threshold");
    t
}

/// Threshold every pixel, optionally perturbed by uniform noise.
///
/// A pixel is white iff `value + n > threshold`, with `n` drawn uniformly
/// from `[-noise / 2, noise / 2)`. There is no error propagation.
pub fn threshold_dither(image: &LinearImage, threshold: f64, noise: f64, out: &mut [u8]) {
    threshold_with_seed(image, threshold, noise, DitherOptions::new().seed, out);
}

pub(crate) fn threshold_with_seed(
    image: &LinearImage,
    threshold: f64,
    noise: f64,
    seed: u64,
    out: &mut [u8],
) {
    check_output(image, out);
    let noise = noise.clamp(0.0, 1.0);
    let mut rng = Noise::new(seed);
    for (o, &v) in out.iter_mut().zip(image.pixels()) {
        let n = if noise > 0.0 {
            (rng.uniform() - 0.5) * noise
        } else {
            0.0
        };
        *o = if v + n > threshold { WHITE } else { BLACK };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_auto_threshold_bimodal() {
        let values: Vec<f64> = (0..64).map(|i| if i % 2 == 0 { 0.1 } else { 0.9 }).collect();
        let image = LinearImage::from_luma(8, 8, &values).unwrap();
        let t = auto_threshold(&image);
        assert!((t - 0.5).abs() < 1e-9, "symmetric modes split at 0.5, got {t}");
    }

    #[test]
    fn test_auto_threshold_skewed() {
        // Three dark pixels, one light: isodata still lands between the modes
        let image = LinearImage::from_luma(4, 1, &[0.2, 0.2, 0.2, 0.8]).unwrap();
        let t = auto_threshold(&image);
        assert!(t > 0.2 && t < 0.8, "threshold {t} between modes");
    }

    #[test]
    fn test_auto_threshold_flat_image() {
        let image = LinearImage::from_luma(3, 1, &[0.3, 0.3, 0.3]).unwrap();
        assert_eq!(auto_threshold(&image), 0.5);
        let white = LinearImage::from_luma(3, 1, &[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(auto_threshold(&white), 0.5);
    }

    #[test]
    fn test_threshold_without_noise() {
        let image = LinearImage::from_luma(4, 1, &[0.0, 0.4, 0.6, 1.0]).unwrap();
        let mut out = vec![0u8; 4];
        threshold_dither(&image, 0.5, 0.0, &mut out);
        assert_eq!(out, vec![BLACK, BLACK, WHITE, WHITE]);
    }

    #[test]
    fn test_threshold_noise_is_bounded_and_seeded() {
        // Pixels further than noise/2 from the threshold never flip
        let image = LinearImage::from_luma(4, 1, &[0.2, 0.45, 0.55, 0.8]).unwrap();
        let mut a = vec![0u8; 4];
        let mut b = vec![0u8; 4];
        threshold_with_seed(&image, 0.5, 0.5, 11, &mut a);
        threshold_with_seed(&image, 0.5, 0.5, 11, &mut b);
        assert_eq!(a, b, "same seed, same output");
        assert_eq!(a[0], BLACK);
        assert_eq!(a[3], WHITE);
    }
}
