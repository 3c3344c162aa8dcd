//! Error diffusion with intensity-dependent coefficients.
//!
//! The three weights (next pixel, diagonal behind, below) are looked up from
//! the pixel's input level on a 0..=255 scale. Levels above 127 use the
//! entry for `255 - level`.

use super::{check_output, DitherOptions, ErrorBuffer, Noise};
use crate::image::LinearImage;
use crate::output::{BLACK, WHITE};

/// Coefficient family for [`variable_error_diffusion_dither`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariableKind {
    /// Ostromoukhov, "A Simple and Efficient Error-Diffusion Algorithm" (2001).
    #[default]
    Ostromoukhov,
    /// Zhou and Fang, "Improving Mid-tone Quality of Variable-Coefficient
    /// Error Diffusion Using Threshold Modulation" (2003). Adds a seeded,
    /// level-dependent threshold modulation.
    ZhouFang,
}

/// `(dx, dy)` of the next, diagonal-behind and below neighbours for a
/// left-to-right row.
const OFFSETS: [(isize, usize); 3] = [(1, 0), (-1, 1), (0, 1)];

/// Ostromoukhov coefficients `[next, diagonal behind, below]` for levels 0..=127.
#[rustfmt::skip]
const OSTROMOUKHOV: [[i32; 3]; 128] = [
    [13, 0, 5], [13, 0, 5], [21, 0, 10], [7, 0, 4],
    [8, 0, 5], [47, 3, 28], [23, 3, 13], [15, 3, 8],
    [22, 6, 11], [43, 15, 20], [7, 3, 3], [501, 224, 211],
    [249, 116, 103], [165, 80, 67], [123, 62, 49], [489, 256, 191],
    [81, 44, 31], [483, 272, 181], [60, 35, 22], [53, 32, 19],
    [237, 148, 83], [471, 304, 161], [3, 2, 1], [481, 314, 185],
    [354, 226, 155], [1389, 866, 685], [227, 138, 125], [267, 158, 163],
    [327, 188, 220], [61, 34, 45], [627, 338, 505], [1227, 638, 1075],
    [20, 10, 19], [1937, 1000, 1767], [977, 520, 855], [657, 360, 551],
    [71, 40, 57], [2005, 1160, 1539], [337, 200, 247], [2039, 1240, 1425],
    [257, 160, 171], [691, 440, 437], [1045, 680, 627], [301, 200, 171],
    [177, 120, 95], [2141, 1480, 1083], [1079, 760, 513], [725, 520, 323],
    [137, 100, 57], [2209, 1640, 855], [53, 40, 19], [2243, 1720, 741],
    [565, 440, 171], [759, 600, 209], [1147, 920, 285], [2311, 1880, 513],
    [97, 80, 19], [335, 280, 57], [1181, 1000, 171], [793, 680, 95],
    [599, 520, 57], [2413, 2120, 171], [405, 360, 19], [2447, 2200, 57],
    [11, 10, 0], [158, 151, 3], [178, 179, 7], [1030, 1091, 63],
    [248, 277, 21], [318, 375, 35], [458, 571, 63], [878, 1159, 147],
    [5, 7, 1], [172, 181, 37], [97, 76, 22], [72, 41, 17],
    [119, 47, 29], [4, 1, 1], [4, 1, 1], [4, 1, 1],
    [4, 1, 1], [4, 1, 1], [4, 1, 1], [4, 1, 1],
    [4, 1, 1], [4, 1, 1], [65, 18, 17], [95, 29, 26],
    [185, 62, 53], [30, 11, 9], [35, 14, 11], [85, 37, 28],
    [55, 26, 19], [80, 41, 29], [155, 86, 59], [5, 3, 2],
    [5, 3, 2], [5, 3, 2], [5, 3, 2], [5, 3, 2],
    [5, 3, 2], [5, 3, 2], [5, 3, 2], [5, 3, 2],
    [5, 3, 2], [5, 3, 2], [5, 3, 2], [5, 3, 2],
    [305, 176, 119], [155, 86, 59], [105, 56, 39], [80, 41, 29],
    [65, 32, 23], [55, 26, 19], [335, 152, 113], [85, 37, 28],
    [115, 48, 37], [35, 14, 11], [355, 136, 109], [30, 11, 9],
    [365, 128, 107], [185, 62, 53], [25, 8, 7], [95, 29, 26],
    [385, 112, 103], [65, 18, 17], [395, 104, 101], [4, 1, 1],
];

/// Zhou-Fang key levels with `[next, diagonal behind, below]` coefficients.
/// Levels in between are interpolated linearly.
#[rustfmt::skip]
const ZHOU_FANG_KEYS: [(usize, [i32; 3]); 18] = [
    (0, [13, 0, 5]),
    (1, [1_300_249, 0, 499_250]),
    (2, [213_113, 287, 99_357]),
    (3, [351_854, 0, 199_965]),
    (4, [801_100, 0, 490_999]),
    (10, [704_075, 297_466, 303_694]),
    (22, [46_613, 31_917, 21_469]),
    (32, [47_482, 30_617, 21_900]),
    (44, [43_024, 42_131, 14_826]),
    (64, [36_411, 43_219, 20_369]),
    (72, [38_477, 53_974, 7_550]),
    (77, [40_503, 51_120, 8_378]),
    (85, [35_865, 34_521, 29_615]),
    (95, [34_115, 36_946, 28_940]),
    (102, [35_464, 35_380, 29_156]),
    (107, [16_477, 14_945, 10_094]),
    (112, [33_360, 35_429, 31_211]),
    (127, [35_269, 36_221, 28_511]),
];

/// Zhou-Fang threshold modulation strength at key levels.
const ZHOU_FANG_STRENGTH: [(usize, f64); 9] = [
    (0, 0.0),
    (44, 0.34),
    (64, 0.50),
    (85, 1.0),
    (95, 0.17),
    (102, 0.5),
    (107, 0.7),
    (112, 0.79),
    (127, 1.0),
];

/// Mirrored table index for an intensity in `[0, 1]`.
#[inline]
fn level(value: f64) -> usize {
    let level = ((value * 255.0 + 0.5) as i32).clamp(0, 255) as usize;
    if level > 127 {
        255 - level
    } else {
        level
    }
}

fn normalize(c: [i32; 3]) -> [f64; 3] {
    let sum = (c[0] + c[1] + c[2]) as f64;
    [c[0] as f64 / sum, c[1] as f64 / sum, c[2] as f64 / sum]
}

fn ostromoukhov_weights(level: usize) -> [f64; 3] {
    normalize(OSTROMOUKHOV[level])
}

/// Key interval `keys[i]..=keys[i + 1]` holding `level`, and the position
/// of `level` inside it.
fn key_interval(keys: &[usize], level: usize) -> (usize, f64) {
    let i = keys
        .windows(2)
        .position(|w| level <= w[1])
        .unwrap_or(keys.len() - 2);
    let (k0, k1) = (keys[i], keys[i + 1]);
    (i, (level - k0) as f64 / (k1 - k0) as f64)
}

fn zhou_fang_weights(level: usize) -> [f64; 3] {
    let keys: Vec<usize> = ZHOU_FANG_KEYS.iter().map(|k| k.0).collect();
    let (i, t) = key_interval(&keys, level);
    let a = normalize(ZHOU_FANG_KEYS[i].1);
    let b = normalize(ZHOU_FANG_KEYS[i + 1].1);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

fn zhou_fang_strength(level: usize) -> f64 {
    let keys: Vec<usize> = ZHOU_FANG_STRENGTH.iter().map(|k| k.0).collect();
    let (i, t) = key_interval(&keys, level);
    let (a, b) = (ZHOU_FANG_STRENGTH[i].1, ZHOU_FANG_STRENGTH[i + 1].1);
    a + (b - a) * t
}

/// Variable-coefficient error diffusion.
///
/// Same traversal and boundary policy as
/// [`error_diffusion_dither`](super::error_diffusion_dither), without jitter.
/// [`VariableKind::ZhouFang`] draws its threshold modulation from a
/// fixed-seed generator, so output is reproducible.
pub fn variable_error_diffusion_dither(
    image: &LinearImage,
    kind: VariableKind,
    serpentine: bool,
    out: &mut [u8],
) {
    let options = DitherOptions::new().serpentine(serpentine);
    variable_with_options(image, kind, &options, out);
}

pub(crate) fn variable_with_options(
    image: &LinearImage,
    kind: VariableKind,
    options: &DitherOptions,
    out: &mut [u8],
) {
    check_output(image, out);
    let (width, height) = (image.width(), image.height());
    let pixels = image.pixels();
    let mut noise = Noise::new(options.seed);

    // Per-level tables, built once
    let weights: Vec<[f64; 3]> = (0..128)
        .map(|l| match kind {
            VariableKind::Ostromoukhov => ostromoukhov_weights(l),
            VariableKind::ZhouFang => zhou_fang_weights(l),
        })
        .collect();
    let strength: Vec<f64> = match kind {
        VariableKind::Ostromoukhov => vec![0.0; 128],
        VariableKind::ZhouFang => (0..128).map(zhou_fang_strength).collect(),
    };

    let mut error_buf = ErrorBuffer::new(width, 2);
    for y in 0..height {
        let reverse = options.serpentine && y % 2 == 1;
        let x_range: Box<dyn Iterator<Item = usize>> = if reverse {
            Box::new((0..width).rev())
        } else {
            Box::new(0..width)
        };

        for x in x_range {
            let idx = y * width + x;
            let input = pixels[idx];
            let l = level(input);
            let threshold = if strength[l] > 0.0 {
                0.5 + (noise.uniform() - 0.5) * 0.5 * strength[l]
            } else {
                0.5
            };
            let value = input + error_buf.get_accumulated(x);
            let white = value > threshold;
            out[idx] = if white { WHITE } else { BLACK };
            let error = value - if white { 1.0 } else { 0.0 };

            for (&(dx, dy), &w) in OFFSETS.iter().zip(&weights[l]) {
                let dx = if reverse { -dx } else { dx };
                let nx = x as isize + dx;
                if nx < 0 || nx >= width as isize || y + dy >= height {
                    continue;
                }
                error_buf.add_error(nx as usize, dy, error * w);
            }
        }
        error_buf.advance_row();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mirrors() {
        assert_eq!(level(0.0), 0);
        assert_eq!(level(1.0), 0);
        assert_eq!(level(127.0 / 255.0), 127);
        assert_eq!(level(128.0 / 255.0), 127);
    }

    #[test]
    fn test_weights_are_normalized() {
        for l in 0..128 {
            for (name, w) in [
                ("ostromoukhov", ostromoukhov_weights(l)),
                ("zhou-fang", zhou_fang_weights(l)),
            ] {
                let sum: f64 = w.iter().sum();
                assert!((sum - 1.0).abs() < 1e-9, "{name} level {l}: sum {sum}");
                assert!(w.iter().all(|&c| c >= 0.0), "{name} level {l}: negative weight");
            }
        }
    }

    #[test]
    fn test_zhou_fang_keys_are_exact() {
        let w = zhou_fang_weights(64);
        let expected = normalize([36_411, 43_219, 20_369]);
        for (a, b) in w.iter().zip(&expected) {
            assert!((a - b).abs() < 1e-12, "key level weights must not be blended");
        }
        assert_eq!(zhou_fang_strength(85), 1.0);
        assert!((zhou_fang_strength(54) - 0.42).abs() < 1e-12);
    }

    #[test]
    fn test_extremes_and_mean() {
        for kind in [VariableKind::Ostromoukhov, VariableKind::ZhouFang] {
            let white = LinearImage::from_fn(8, 8, |_, _| 1.0).unwrap();
            let mut out = vec![0u8; 64];
            variable_error_diffusion_dither(&white, kind, true, &mut out);
            assert!(out.iter().all(|&p| p == WHITE), "{kind:?}: white");

            let grey = LinearImage::from_fn(32, 32, |_, _| 0.3).unwrap();
            let mut out = vec![0u8; 1024];
            variable_error_diffusion_dither(&grey, kind, true, &mut out);
            let frac = out.iter().filter(|&&p| p == WHITE).count() as f64 / 1024.0;
            assert!((frac - 0.3).abs() < 0.03, "{kind:?}: white fraction {frac}");
        }
    }

    #[test]
    fn test_zhou_fang_is_reproducible() {
        let image = LinearImage::from_fn(16, 16, |x, y| (x * y) as f64 / 225.0).unwrap();
        let mut a = vec![0u8; 256];
        let mut b = vec![0u8; 256];
        variable_error_diffusion_dither(&image, VariableKind::ZhouFang, true, &mut a);
        variable_error_diffusion_dither(&image, VariableKind::ZhouFang, true, &mut b);
        assert_eq!(a, b);
    }
}
