//! Kacker-Allebach style halftoning with randomly rotated screens.
//!
//! The image is covered by 8x8 blocks. Every block is thresholded by one of
//! the eight rotations and reflections of a single void-and-cluster screen,
//! which breaks up the periodic texture a fixed screen would leave.

use std::sync::OnceLock;

use super::{check_output, DitherOptions, Noise};
use crate::image::LinearImage;
use crate::matrix::void_cluster;
use crate::output::{BLACK, WHITE};

const BLOCK: usize = 8;

fn screen() -> &'static [u32] {
    static SCREEN: OnceLock<Vec<u32>> = OnceLock::new();
    SCREEN.get_or_init(|| void_cluster::generate(BLOCK, BLOCK, 1.5, 0xa11e))
}

/// Map `(x, y)` through one of the eight symmetries of the square.
#[inline]
fn transform(t: usize, x: usize, y: usize) -> (usize, usize) {
    let (x, y) = if t & 4 != 0 { (y, x) } else { (x, y) };
    let x = if t & 1 != 0 { BLOCK - 1 - x } else { x };
    let y = if t & 2 != 0 { BLOCK - 1 - y } else { y };
    (x, y)
}

/// Position hash picking a block's transform in deterministic mode.
#[inline]
fn block_hash(bx: usize, by: usize) -> usize {
    let mut h = (bx as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
        ^ (by as u64).wrapping_add(1).wrapping_mul(0xc2b2_ae3d_27d4_eb4f);
    h ^= h >> 29;
    h = h.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    h ^= h >> 32;
    (h % 8) as usize
}

/// Dither with per-block screen transforms.
///
/// With `random == false` the transform of each block comes from a hash of
/// its position. With `random == true` it is drawn from a generator seeded
/// with [`DEFAULT_SEED`](super::DEFAULT_SEED); use
/// [`Ditherer`](crate::Ditherer) with a seed to vary it.
pub fn kallebach_dither(image: &LinearImage, random: bool, out: &mut [u8]) {
    kallebach_with_seed(image, random, DitherOptions::new().seed, out);
}

pub(crate) fn kallebach_with_seed(image: &LinearImage, random: bool, seed: u64, out: &mut [u8]) {
    check_output(image, out);
    let (width, height) = (image.width(), image.height());
    let pixels = image.pixels();
    let screen = screen();
    let cells = (BLOCK * BLOCK) as f64;
    let mut rng = Noise::new(seed);

    for by in 0..height.div_ceil(BLOCK) {
        for bx in 0..width.div_ceil(BLOCK) {
            let t = if random {
                rng.index(8)
            } else {
                block_hash(bx, by)
            };
            for ly in 0..BLOCK {
                let y = by * BLOCK + ly;
                if y >= height {
                    break;
                }
                for lx in 0..BLOCK {
                    let x = bx * BLOCK + lx;
                    if x >= width {
                        break;
                    }
                    let (sx, sy) = transform(t, lx, ly);
                    let threshold = (screen[sy * BLOCK + sx] as f64 + 0.5) / cells;
                    let idx = y * width + x;
                    out[idx] = if pixels[idx] > threshold { WHITE } else { BLACK };
                }
            }
        }
    }
}
