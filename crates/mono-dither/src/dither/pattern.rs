//! Tile pattern dithering.

use super::check_output;
use crate::image::LinearImage;
use crate::matrix::TilePattern;
use crate::output::{BLACK, WHITE};

/// Replace every `width x height` block by the stamp matching its average.
///
/// Blocks cut by the right or bottom edge average over their in-image
/// pixels only and are stamped with the matching part of the tile.
pub fn pattern_dither(image: &LinearImage, pattern: &TilePattern, out: &mut [u8]) {
    check_output(image, out);
    let (width, height) = (image.width(), image.height());
    let (pw, ph) = (pattern.width(), pattern.height());
    let pixels = image.pixels();

    for by in (0..height).step_by(ph) {
        for bx in (0..width).step_by(pw) {
            let (bw, bh) = (pw.min(width - bx), ph.min(height - by));
            let mut sum = 0.0;
            for y in by..by + bh {
                sum += pixels[y * width + bx..y * width + bx + bw].iter().sum::<f64>();
            }
            let tile = pattern.tile(pattern.level_for(sum / (bw * bh) as f64));
            for ly in 0..bh {
                for lx in 0..bw {
                    let white = tile[ly * pw + lx];
                    out[(by + ly) * width + bx + lx] = if white { WHITE } else { BLACK };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::TILE_PATTERNS;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stamps_match_average() {
        let p = TILE_PATTERNS.get("2x2").unwrap();
        // Block averages 0.0 and 0.3: levels 0 and 1
        let image = LinearImage::from_luma(4, 2, &[0.0, 0.0, 0.3, 0.3, 0.0, 0.0, 0.3, 0.3]).unwrap();
        let mut out = vec![0u8; 8];
        pattern_dither(&image, &p, &mut out);
        assert_eq!(out, vec![BLACK, BLACK, WHITE, BLACK, BLACK, BLACK, BLACK, BLACK]);
    }

    #[test]
    fn test_partial_edge_blocks() {
        let p = TILE_PATTERNS.get("3x3_v2").unwrap();
        let image = LinearImage::from_fn(4, 4, |_, _| 1.0).unwrap();
        let mut out = vec![0u8; 16];
        pattern_dither(&image, &p, &mut out);
        assert!(out.iter().all(|&px| px == WHITE), "white edge blocks stay white");
    }
}
