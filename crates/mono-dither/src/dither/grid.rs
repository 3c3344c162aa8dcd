//! Grid dithering: each cell keeps its black-pixel count.

use super::check_output;
use crate::image::LinearImage;
use crate::output::{BLACK, WHITE};

/// Quantize every `cell_width x cell_height` cell to a number of black
/// pixels and blacken that many of its darkest pixels.
///
/// A cell of `c` pixels with mean `m` gets `n = round((1 - m) * c)` black
/// pixels, placed on the darkest pixels first (ties in raster order).
/// `min_pixels` is clamped to `[0, c]`. The standard mode raises any
/// non-zero `n` below `min_pixels` to `min_pixels`, forming dots no smaller
/// than that; `alt_algorithm` instead drops such cells to zero black pixels.
/// Zero cell dimensions count as one.
pub fn grid_dither(
    image: &LinearImage,
    cell_width: usize,
    cell_height: usize,
    min_pixels: usize,
    alt_algorithm: bool,
    out: &mut [u8],
) {
    check_output(image, out);
    let (width, height) = (image.width(), image.height());
    let (gw, gh) = (cell_width.max(1), cell_height.max(1));
    let pixels = image.pixels();
    let mut cell: Vec<usize> = Vec::with_capacity(gw * gh);

    for cy in (0..height).step_by(gh) {
        for cx in (0..width).step_by(gw) {
            cell.clear();
            for y in cy..(cy + gh).min(height) {
                cell.extend((cx..(cx + gw).min(width)).map(|x| y * width + x));
            }
            let cells = cell.len();
            let min = min_pixels.min(cells);
            let mean = cell.iter().map(|&i| pixels[i]).sum::<f64>() / cells as f64;
            let mut black = (((1.0 - mean) * cells as f64).round() as usize).min(cells);
            if black > 0 && black < min {
                black = if alt_algorithm { 0 } else { min };
            }

            // Raster order is kept for equal values
            cell.sort_by(|&a, &b| pixels[a].total_cmp(&pixels[b]).then(a.cmp(&b)));
            for (rank, &i) in cell.iter().enumerate() {
                out[i] = if rank < black { BLACK } else { WHITE };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn black_count(out: &[u8]) -> usize {
        out.iter().filter(|&&p| p == BLACK).count()
    }

    #[test]
    fn test_darkest_pixels_go_black() {
        let image = LinearImage::from_luma(2, 2, &[0.9, 0.2, 0.6, 0.3]).unwrap();
        let mut out = vec![0u8; 4];
        grid_dither(&image, 2, 2, 0, false, &mut out);
        // mean 0.5 -> 2 black: the 0.2 and 0.3 pixels
        assert_eq!(out, vec![WHITE, BLACK, WHITE, BLACK]);
    }

    #[test]
    fn test_min_pixels_modes() {
        // mean 0.9 over 9 pixels -> n = 1
        let image = LinearImage::from_fn(3, 3, |_, _| 0.9).unwrap();
        let mut out = vec![0u8; 9];
        grid_dither(&image, 3, 3, 4, false, &mut out);
        assert_eq!(black_count(&out), 4, "standard mode raises to min_pixels");
        grid_dither(&image, 3, 3, 4, true, &mut out);
        assert_eq!(black_count(&out), 0, "alternative mode drops the dot");
    }

    #[test]
    fn test_min_pixels_is_clamped() {
        let image = LinearImage::from_fn(2, 2, |_, _| 0.8).unwrap();
        let mut out = vec![0u8; 4];
        grid_dither(&image, 2, 2, 100, false, &mut out);
        assert_eq!(black_count(&out), 4);
    }

    #[test]
    fn test_white_cells_stay_white() {
        let image = LinearImage::from_fn(5, 5, |_, _| 1.0).unwrap();
        let mut out = vec![0u8; 25];
        grid_dither(&image, 2, 2, 3, false, &mut out);
        assert_eq!(black_count(&out), 0);
        grid_dither(&image, 0, 0, 3, false, &mut out);
        assert_eq!(black_count(&out), 0);
    }
}
