//! Knuth-style dot diffusion.

use super::{check_output, quantize};
use crate::image::LinearImage;
use crate::matrix::{DotClassMatrix, DotDiffusionMatrix};

/// Dot diffusion with a tiled class matrix and a diffusion footprint.
///
/// Pixels are processed in ascending `(class, raster index)` order. Each
/// pixel is thresholded at 0.5 and hands its error to the neighbours in the
/// footprint that come later in that order, normalised by the sum of their
/// weights. A pixel with no such neighbour drops its error.
pub fn dot_diffusion_dither(
    image: &LinearImage,
    classes: &DotClassMatrix,
    diffusion: &DotDiffusionMatrix,
    out: &mut [u8],
) {
    diffuse_by_class(image, classes, &diffusion.offsets(), out);
}

/// Class-order diffusion shared with Lippens-Philips dithering.
pub(crate) fn diffuse_by_class(
    image: &LinearImage,
    classes: &DotClassMatrix,
    offsets: &[(isize, isize, f64)],
    out: &mut [u8],
) {
    check_output(image, out);
    let (width, height) = (image.width(), image.height());
    let len = image.len();

    // Stable total order: class first, raster index second
    let mut order: Vec<usize> = (0..len).collect();
    order.sort_by_key(|&i| (classes.class_at(i % width, i / width), i));
    let mut position = vec![0usize; len];
    for (p, &i) in order.iter().enumerate() {
        position[i] = p;
    }

    let mut values = image.pixels().to_vec();
    let mut targets: Vec<(usize, f64)> = Vec::with_capacity(offsets.len());
    for &i in &order {
        let (byte, level) = quantize(values[i]);
        out[i] = byte;
        let error = values[i] - level;

        let (x, y) = ((i % width) as isize, (i / width) as isize);
        targets.clear();
        for &(dx, dy, weight) in offsets {
            let (nx, ny) = (x + dx, y + dy);
            if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                continue;
            }
            let j = ny as usize * width + nx as usize;
            if position[j] > position[i] {
                targets.push((j, weight));
            }
        }
        let total: f64 = targets.iter().map(|&(_, w)| w).sum();
        if total > 0.0 {
            for &(j, w) in &targets {
                values[j] += error * w / total;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{DOT_CLASS_MATRICES, DOT_DIFFUSION_MATRICES};
    use crate::output::{BLACK, WHITE};

    fn run(image: &LinearImage, class: &str, diffusion: &str) -> Vec<u8> {
        let classes = DOT_CLASS_MATRICES.get(class).unwrap();
        let diffusion = DOT_DIFFUSION_MATRICES.get(diffusion).unwrap();
        let mut out = vec![0u8; image.len()];
        dot_diffusion_dither(image, &classes, &diffusion, &mut out);
        out
    }

    #[test]
    fn test_extremes() {
        let white = LinearImage::from_fn(10, 10, |_, _| 1.0).unwrap();
        assert!(run(&white, "knuth", "default").iter().all(|&p| p == WHITE));
        let black = LinearImage::new(10, 10).unwrap();
        assert!(run(&black, "knuth", "default").iter().all(|&p| p == BLACK));
    }

    #[test]
    fn test_mid_grey_density() {
        let image = LinearImage::from_fn(32, 32, |_, _| 0.5).unwrap();
        for class in ["knuth", "mini_knuth", "spiral"] {
            let out = run(&image, class, "default");
            let frac = out.iter().filter(|&&p| p == WHITE).count() as f64 / 1024.0;
            assert!((frac - 0.5).abs() < 0.12, "{class}: white fraction {frac}");
        }
    }

    #[test]
    fn test_first_pixel_of_one_class_cell() {
        // With a single-class matrix the order degenerates to raster order:
        // a 0.6 pixel turns white and pushes -0.4 onward, darkening its neighbours
        let classes = DotClassMatrix::new(1, 1, &[0]).unwrap();
        let diffusion = DotDiffusionMatrix::new(3, 1, &[1.0, 0.0, 1.0]).unwrap();
        let image = LinearImage::from_luma(3, 1, &[0.6, 0.6, 0.6]).unwrap();
        let mut out = vec![0u8; 3];
        dot_diffusion_dither(&image, &classes, &diffusion, &mut out);
        assert_eq!(out, [WHITE, BLACK, WHITE]);
    }
}
