//! Direct binary search.
//!
//! DBS refines a halftone by greedy local search. The error image
//! `e = binary - gray` is judged through a Gaussian model of the eye `p`:
//! the metric is `E = sum((p * e)^2)`, which equals `sum(e * cpe)` with
//! `cpp = p ⋆ p` (the filter autocorrelation) and `cpe = cpp * e`.
//!
//! For every pixel, in raster order, the candidate moves are toggling the
//! pixel or swapping it with one of its eight neighbours of opposite value.
//! The change in `E` of each move follows from `cpp` and `cpe` alone, so a
//! move costs O(1) to evaluate. The best strictly improving move is applied
//! at once and `cpe` is updated before the next pixel is examined.

use super::{check_output, diffuse, DitherOptions};
use crate::image::LinearImage;
use crate::matrix::FLOYD_STEINBERG;
use crate::output::{BLACK, WHITE};

/// Highest accepted coarseness level.
pub const MAX_LEVEL: u32 = 7;

/// Passes allowed at level 0; each level removes one.
const BASE_PASSES: usize = 16;

/// Moves must lower the metric by more than this to count.
const EPSILON: f64 = 1e-12;

const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// DBS optimizer state: candidate halftone plus the `cpe` cache.
///
/// # Example
///
/// ```
/// use mono_dither::dither::Dbs;
/// use mono_dither::LinearImage;
///
/// let image = LinearImage::from_fn(16, 16, |x, _| x as f64 / 15.0).unwrap();
/// let mut dbs = Dbs::new(&image, 3);
/// let start = dbs.metric();
/// dbs.run();
/// assert!(dbs.metric() <= start);
/// ```
#[derive(Debug, Clone)]
pub struct Dbs<'a> {
    width: usize,
    height: usize,
    gray: &'a [f64],
    /// Candidate halftone, 0.0 or 1.0 per pixel.
    binary: Vec<f64>,
    /// Autocorrelation of the eye filter, `(2 * radius + 1)^2` taps.
    cpp: Vec<f64>,
    cpp_radius: isize,
    /// `cpp` convolved with the current error image.
    cpe: Vec<f64>,
    metric: f64,
    /// Metric before the first pass and after every pass.
    history: Vec<f64>,
    max_passes: usize,
    passes: usize,
    converged: bool,
}

impl<'a> Dbs<'a> {
    /// Start from a Floyd-Steinberg halftone of `image`.
    ///
    /// `level` (clamped to `0..=7`) widens the eye filter
    /// (`sigma = 1 + level / 4`) and shortens the pass budget to
    /// `16 - level`.
    pub fn new(image: &'a LinearImage, level: u32) -> Self {
        let level = level.min(MAX_LEVEL);
        let mut initial = vec![0u8; image.len()];
        let options = DitherOptions::new().serpentine(false);
        diffuse(image, &FLOYD_STEINBERG, &options, &mut initial);

        let sigma = 1.0 + 0.25 * level as f64;
        let (cpp, cpp_radius) = autocorrelation(&gaussian_filter(sigma));

        let mut dbs = Self {
            width: image.width(),
            height: image.height(),
            gray: image.pixels(),
            binary: initial.iter().map(|&b| if b == WHITE { 1.0 } else { 0.0 }).collect(),
            cpp,
            cpp_radius,
            cpe: vec![0.0; image.len()],
            metric: 0.0,
            history: Vec::new(),
            max_passes: BASE_PASSES - level as usize,
            passes: 0,
            converged: false,
        };
        dbs.refresh();
        dbs.history.push(dbs.metric);
        dbs
    }

    /// Recompute `cpe` and the metric from scratch.
    fn refresh(&mut self) {
        let error: Vec<f64> = self.binary.iter().zip(self.gray).map(|(b, g)| b - g).collect();
        self.cpe.fill(0.0);
        for i in 0..error.len() {
            if error[i] != 0.0 {
                self.spread(i, error[i]);
            }
        }
        self.metric = self.full_metric();
    }

    /// `sum(e * cpe)` over the current state.
    fn full_metric(&self) -> f64 {
        self.binary
            .iter()
            .zip(self.gray)
            .zip(&self.cpe)
            .map(|((b, g), c)| (b - g) * c)
            .sum()
    }

    #[inline]
    fn cpp_at(&self, dx: isize, dy: isize) -> f64 {
        let r = self.cpp_radius;
        if dx.abs() > r || dy.abs() > r {
            return 0.0;
        }
        let side = (2 * r + 1) as usize;
        self.cpp[(dy + r) as usize * side + (dx + r) as usize]
    }

    /// Add `amount * cpp(. - i)` to `cpe`.
    fn spread(&mut self, i: usize, amount: f64) {
        let r = self.cpp_radius;
        let (x, y) = ((i % self.width) as isize, (i / self.width) as isize);
        let side = (2 * r + 1) as usize;
        for dy in -r..=r {
            let ny = y + dy;
            if ny < 0 || ny >= self.height as isize {
                continue;
            }
            for dx in -r..=r {
                let nx = x + dx;
                if nx < 0 || nx >= self.width as isize {
                    continue;
                }
                let tap = self.cpp[(dy + r) as usize * side + (dx + r) as usize];
                self.cpe[ny as usize * self.width + nx as usize] += amount * tap;
            }
        }
    }

    /// Examine pixel `i` and apply its best improving move.
    fn visit(&mut self, i: usize) -> bool {
        let (x, y) = ((i % self.width) as isize, (i / self.width) as isize);
        let a0 = 1.0 - 2.0 * self.binary[i];
        let c0 = self.cpp_at(0, 0);

        // Toggle
        let mut best = 2.0 * a0 * self.cpe[i] + a0 * a0 * c0;
        let mut swap_with = None;

        for &(dx, dy) in &NEIGHBOURS {
            let (nx, ny) = (x + dx, y + dy);
            if nx < 0 || ny < 0 || nx >= self.width as isize || ny >= self.height as isize {
                continue;
            }
            let j = ny as usize * self.width + nx as usize;
            if self.binary[j] == self.binary[i] {
                continue;
            }
            let a1 = -a0;
            let delta = 2.0 * a0 * self.cpe[i]
                + 2.0 * a1 * self.cpe[j]
                + (a0 * a0 + a1 * a1) * c0
                + 2.0 * a0 * a1 * self.cpp_at(dx, dy);
            if delta < best {
                best = delta;
                swap_with = Some(j);
            }
        }

        if best >= -EPSILON {
            return false;
        }
        self.binary[i] += a0;
        self.spread(i, a0);
        if let Some(j) = swap_with {
            self.binary[j] -= a0;
            self.spread(j, -a0);
        }
        self.metric += best;
        true
    }

    /// Run one raster pass; returns the number of accepted moves.
    pub fn pass(&mut self) -> usize {
        let mut moves = 0;
        for i in 0..self.binary.len() {
            if self.visit(i) {
                moves += 1;
            }
        }
        self.passes += 1;
        self.history.push(self.metric);
        if moves == 0 {
            self.converged = true;
        }
        tracing::debug!(pass = self.passes, moves, metric = self.metric, "dbs pass");
        moves
    }

    /// Run passes until one makes no move or the budget is spent.
    pub fn run(&mut self) {
        while !self.converged && self.passes < self.max_passes {
            self.pass();
        }
    }

    /// Current value of the perceptual error metric.
    #[inline]
    pub fn metric(&self) -> f64 {
        self.metric
    }

    /// Metric before the first pass and after each completed pass.
    #[inline]
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Passes run so far.
    #[inline]
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Pass budget for the chosen level.
    #[inline]
    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// True once a pass made no move.
    #[inline]
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Write the candidate halftone as [`BLACK`] / [`WHITE`] bytes.
    pub fn write_output(&self, out: &mut [u8]) {
        for (o, &b) in out.iter_mut().zip(&self.binary) {
            *o = if b > 0.5 { WHITE } else { BLACK };
        }
    }
}

/// Normalised 2D Gaussian with radius `ceil(2 * sigma)`.
fn gaussian_filter(sigma: f64) -> (Vec<f64>, isize) {
    let r = (2.0 * sigma).ceil() as isize;
    let mut taps = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
    for dy in -r..=r {
        for dx in -r..=r {
            taps.push((-((dx * dx + dy * dy) as f64) / (2.0 * sigma * sigma)).exp());
        }
    }
    let sum: f64 = taps.iter().sum();
    taps.iter_mut().for_each(|t| *t /= sum);
    (taps, r)
}

/// Full autocorrelation of a square filter; the result has radius `2r`.
fn autocorrelation((taps, r): &(Vec<f64>, isize)) -> (Vec<f64>, isize) {
    let r = *r;
    let side = (2 * r + 1) as usize;
    let out_r = 2 * r;
    let out_side = (2 * out_r + 1) as usize;
    let mut cpp = vec![0.0; out_side * out_side];
    for ky in -out_r..=out_r {
        for kx in -out_r..=out_r {
            let mut sum = 0.0;
            for y in -r..=r {
                let y2 = y + ky;
                if y2.abs() > r {
                    continue;
                }
                for x in -r..=r {
                    let x2 = x + kx;
                    if x2.abs() > r {
                        continue;
                    }
                    sum += taps[(y + r) as usize * side + (x + r) as usize]
                        * taps[(y2 + r) as usize * side + (x2 + r) as usize];
                }
            }
            cpp[(ky + out_r) as usize * out_side + (kx + out_r) as usize] = sum;
        }
    }
    (cpp, out_r)
}

/// Direct binary search halftoning at coarseness `level` (`0..=7`).
pub fn dbs_dither(image: &LinearImage, level: u32, out: &mut [u8]) {
    check_output(image, out);
    let mut dbs = Dbs::new(image, level);
    dbs.run();
    dbs.write_output(out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> LinearImage {
        LinearImage::from_fn(width, height, |x, y| {
            (x as f64 / (width - 1) as f64 + y as f64 / (height - 1) as f64) / 2.0
        })
        .unwrap()
    }

    #[test]
    fn test_filter_is_normalised_and_symmetric() {
        let (taps, r) = gaussian_filter(1.5);
        assert_eq!(r, 3);
        assert!((taps.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        let (cpp, cr) = autocorrelation(&(taps, r));
        assert_eq!(cr, 6);
        let side = 13;
        let centre = cpp[6 * side + 6];
        assert!(cpp.iter().all(|&c| c <= centre + 1e-15), "autocorrelation peaks at zero lag");
        assert!((cpp[6 * side + 7] - cpp[6 * side + 5]).abs() < 1e-15);
    }

    #[test]
    fn test_history_never_increases() {
        let image = gradient(24, 16);
        let mut dbs = Dbs::new(&image, 0);
        dbs.run();
        for pair in dbs.history().windows(2) {
            assert!(pair[1] <= pair[0] + 1e-9, "metric rose from {} to {}", pair[0], pair[1]);
        }
        assert!(dbs.passes() >= 1);
        assert!(dbs.passes() <= dbs.max_passes());
    }

    #[test]
    fn test_tracked_metric_matches_recomputation() {
        let image = gradient(12, 12);
        let mut dbs = Dbs::new(&image, 2);
        dbs.pass();
        dbs.pass();
        let tracked = dbs.metric();
        dbs.refresh();
        assert!((tracked - dbs.metric()).abs() < 1e-6, "incremental metric drifted");
    }

    #[test]
    fn test_every_accepted_move_lowers_the_metric() {
        let image = gradient(12, 10);
        let mut dbs = Dbs::new(&image, 1);
        let mut accepted = 0;
        for i in 0..image.len() {
            let before = dbs.metric();
            let binary = dbs.binary.clone();
            if dbs.visit(i) {
                accepted += 1;
                assert!(dbs.metric() < before, "move at {i} raised the metric");
                let mut fresh = dbs.clone();
                fresh.refresh();
                assert!(
                    (fresh.metric() - dbs.metric()).abs() < 1e-9,
                    "move at {i}: predicted change differs from the recomputed one"
                );
            } else {
                assert_eq!(dbs.binary, binary, "rejected move at {i} changed the halftone");
            }
        }
        assert!(accepted > 0, "no move improved the Floyd-Steinberg start");
    }

    #[test]
    fn test_improves_on_initial_halftone() {
        let image = gradient(20, 20);
        let mut dbs = Dbs::new(&image, 1);
        let start = dbs.metric();
        dbs.run();
        assert!(dbs.metric() < start, "DBS should improve on its Floyd-Steinberg start");
    }

    #[test]
    fn test_level_budget_and_clamp() {
        let image = gradient(4, 4);
        assert_eq!(Dbs::new(&image, 0).max_passes(), 16);
        assert_eq!(Dbs::new(&image, 7).max_passes(), 9);
        assert_eq!(Dbs::new(&image, 40).max_passes(), 9);
    }

    #[test]
    fn test_extremes_stay_fixed() {
        let white = LinearImage::from_fn(6, 6, |_, _| 1.0).unwrap();
        let mut out = vec![0u8; 36];
        dbs_dither(&white, 0, &mut out);
        assert!(out.iter().all(|&p| p == WHITE));
        let black = LinearImage::new(6, 6).unwrap();
        dbs_dither(&black, 0, &mut out);
        assert!(out.iter().all(|&p| p == BLACK));
    }
}
