//! Riemersma dithering along a space-filling curve.
//!
//! The curve visits every pixel once. A queue of the last sixteen
//! quantization errors acts as a low-pass filter along the curve: newer
//! errors weigh exponentially more, the oldest sixteen times less than the
//! newest.

use super::{check_output, quantize};
use crate::image::LinearImage;
use crate::matrix::Curve;

const QUEUE: usize = 16;

/// Ratio between the newest and the oldest weight.
const RATIO: f64 = 16.0;

fn weights() -> [f64; QUEUE] {
    let step = RATIO.ln() / (QUEUE - 1) as f64;
    std::array::from_fn(|i| (step * i as f64).exp())
}

/// Dither along `curve`, which must have been created for the image size.
///
/// With `use_riemersma` the queue holds the raw pixel error (input minus
/// output) and the weighted sum is divided by 16, as in Riemersma's original
/// algorithm. Otherwise the queue holds the error of the corrected value and
/// the sum is divided by the sum of the weights, so it passes on a true
/// weighted mean.
pub fn riemersma_dither(image: &LinearImage, curve: &Curve, use_riemersma: bool, out: &mut [u8]) {
    check_output(image, out);
    debug_assert_eq!(
        (curve.width(), curve.height()),
        (image.width(), image.height()),
        "curve must be created for the image size"
    );
    let width = image.width();
    let pixels = image.pixels();
    let weights = weights();
    let divisor = if use_riemersma {
        RATIO
    } else {
        weights.iter().sum()
    };

    // errors[QUEUE - 1] is the newest
    let mut errors = [0.0f64; QUEUE];
    for &(x, y) in curve.points() {
        let idx = y * width + x;
        let carried: f64 = errors.iter().zip(&weights).map(|(e, w)| e * w).sum::<f64>() / divisor;
        let value = pixels[idx] + carried;
        let (byte, level) = quantize(value);
        out[idx] = byte;
        errors.rotate_left(1);
        errors[QUEUE - 1] = if use_riemersma {
            pixels[idx] - level
        } else {
            value - level
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::CURVES;
    use crate::output::{BLACK, WHITE};

    fn run(image: &LinearImage, curve: &str, use_riemersma: bool) -> Vec<u8> {
        let curve = CURVES
            .get(curve)
            .unwrap()
            .create_curve(image.width(), image.height())
            .unwrap();
        let mut out = vec![0u8; image.len()];
        riemersma_dither(image, &curve, use_riemersma, &mut out);
        out
    }

    #[test]
    fn test_weights_span_ratio() {
        let w = weights();
        assert!((w[0] - 1.0).abs() < 1e-12);
        assert!((w[QUEUE - 1] - RATIO).abs() < 1e-9);
        assert!(w.windows(2).all(|p| p[1] > p[0]));
    }

    #[test]
    fn test_extremes() {
        let white = LinearImage::from_fn(9, 5, |_, _| 1.0).unwrap();
        let black = LinearImage::new(9, 5).unwrap();
        for mode in [true, false] {
            assert!(run(&white, "hilbert", mode).iter().all(|&p| p == WHITE));
            assert!(run(&black, "hilbert", mode).iter().all(|&p| p == BLACK));
        }
    }

    #[test]
    fn test_mid_grey_density() {
        let image = LinearImage::from_fn(32, 32, |_, _| 0.5).unwrap();
        for mode in [true, false] {
            let out = run(&image, "hilbert", mode);
            let frac = out.iter().filter(|&&p| p == WHITE).count() as f64 / 1024.0;
            assert!((frac - 0.5).abs() < 0.1, "use_riemersma = {mode}: {frac}");
        }
    }

    #[test]
    fn test_both_modes_track_tone() {
        for grey in [0.1, 0.25, 0.75, 0.9] {
            let image = LinearImage::from_fn(64, 64, |_, _| grey).unwrap();
            for mode in [true, false] {
                let out = run(&image, "hilbert", mode);
                let frac = out.iter().filter(|&&p| p == WHITE).count() as f64 / 4096.0;
                assert!(
                    (frac - grey).abs() < 0.03,
                    "use_riemersma = {mode}, grey {grey}: {frac}"
                );
            }
        }
    }

    #[test]
    fn test_modes_differ() {
        let image = LinearImage::from_fn(16, 16, |x, y| (x + y) as f64 / 30.0).unwrap();
        assert_ne!(run(&image, "peano", true), run(&image, "peano", false));
    }
}
