//! Void-and-cluster rank array generation (Ulichney, 1993).
//!
//! Produces a permutation of `0..width*height` whose thresholded prefixes are
//! blue-noise distributed. All distances wrap around the edges, so the
//! result tiles seamlessly.
//!
//! The energy field is updated incrementally with a truncated Gaussian
//! instead of re-blurring the whole pattern after every move.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Fraction of cells set in the initial binary pattern.
const INITIAL_DENSITY: f64 = 0.1;

/// Iteration cap for the initial-pattern relaxation, per cell.
const MAX_ITERATIONS_MULTIPLIER: usize = 10;

struct Field {
    width: usize,
    height: usize,
    bitmap: Vec<bool>,
    energy: Vec<f64>,
    /// (dx, dy, weight) of the truncated toroidal Gaussian.
    kernel: Vec<(isize, isize, f64)>,
}

impl Field {
    fn new(width: usize, height: usize, sigma: f64) -> Self {
        let radius = (3.0 * sigma).ceil() as isize;
        let rx = radius.min((width as isize - 1) / 2);
        let ry = radius.min((height as isize - 1) / 2);
        let divisor = 2.0 * sigma * sigma;
        let mut kernel = Vec::with_capacity(((2 * rx + 1) * (2 * ry + 1)) as usize);
        for dy in -ry..=ry {
            for dx in -rx..=rx {
                let dist_sq = (dx * dx + dy * dy) as f64;
                kernel.push((dx, dy, (-dist_sq / divisor).exp()));
            }
        }
        Self {
            width,
            height,
            bitmap: vec![false; width * height],
            energy: vec![0.0; width * height],
            kernel,
        }
    }

    fn set(&mut self, idx: usize, on: bool) {
        if self.bitmap[idx] == on {
            return;
        }
        self.bitmap[idx] = on;
        let sign = if on { 1.0 } else { -1.0 };
        let (w, h) = (self.width as isize, self.height as isize);
        let (px, py) = ((idx % self.width) as isize, (idx / self.width) as isize);
        for &(dx, dy, weight) in &self.kernel {
            let x = (px + dx).rem_euclid(w) as usize;
            let y = (py + dy).rem_euclid(h) as usize;
            self.energy[y * self.width + x] += sign * weight;
        }
    }

    /// Set pixel with the highest energy: the tightest cluster.
    fn tightest_cluster(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for i in 0..self.bitmap.len() {
            if self.bitmap[i] && best.map_or(true, |b| self.energy[i] > self.energy[b]) {
                best = Some(i);
            }
        }
        best
    }

    /// Unset pixel with the lowest energy: the largest void.
    fn largest_void(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for i in 0..self.bitmap.len() {
            if !self.bitmap[i] && best.map_or(true, |b| self.energy[i] < self.energy[b]) {
                best = Some(i);
            }
        }
        best
    }
}

/// Generate a void-and-cluster rank array.
///
/// `rank[i]` is the order in which cell `i` turns on. The same
/// `(width, height, sigma, seed)` always gives the same array.
pub(crate) fn generate(width: usize, height: usize, sigma: f64, seed: u64) -> Vec<u32> {
    let area = width * height;
    if area <= 1 {
        return vec![0; area];
    }

    let mut field = Field::new(width, height, sigma);
    let mut rng = StdRng::seed_from_u64(seed);

    // Phase 0: random initial pattern, relaxed until no cluster moves
    let initial = ((area as f64 * INITIAL_DENSITY).round() as usize).clamp(1, area / 2);
    let mut cells: Vec<usize> = (0..area).collect();
    cells.shuffle(&mut rng);
    for &i in &cells[..initial] {
        field.set(i, true);
    }
    for _ in 0..area * MAX_ITERATIONS_MULTIPLIER {
        let Some(cluster) = field.tightest_cluster() else {
            break;
        };
        field.set(cluster, false);
        let Some(void) = field.largest_void() else {
            field.set(cluster, true);
            break;
        };
        field.set(void, true);
        if void == cluster {
            break;
        }
    }
    let prototype = field.bitmap.clone();

    let mut rank = vec![0u32; area];

    // Phase 1: remove the initial points from the tightest clusters down
    for r in (0..initial).rev() {
        if let Some(cluster) = field.tightest_cluster() {
            field.set(cluster, false);
            rank[cluster] = r as u32;
        }
    }

    // Phase 2 and 3: restore the prototype, then fill the largest voids.
    // With a shift-invariant kernel the minority-inverted phase 3 picks the
    // same cells as continuing to fill voids.
    for (i, &on) in prototype.iter().enumerate() {
        field.set(i, on);
    }
    for r in initial..area {
        if let Some(void) = field.largest_void() {
            field.set(void, true);
            rank[void] = r as u32;
        }
    }

    tracing::debug!(width, height, sigma, seed, "generated void-and-cluster array");
    rank
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation(rank: &[u32]) -> bool {
        let mut seen = vec![false; rank.len()];
        for &r in rank {
            let r = r as usize;
            if r >= rank.len() || seen[r] {
                return false;
            }
            seen[r] = true;
        }
        true
    }

    #[test]
    fn test_generate_is_permutation() {
        let rank = generate(16, 16, 1.5, 7);
        assert_eq!(rank.len(), 256);
        assert!(is_permutation(&rank), "ranks must cover 0..256 exactly once");
    }

    #[test]
    fn test_generate_is_deterministic() {
        assert_eq!(generate(8, 8, 1.5, 3), generate(8, 8, 1.5, 3));
    }

    #[test]
    fn test_non_square() {
        let rank = generate(12, 5, 1.2, 1);
        assert!(is_permutation(&rank));
    }

    #[test]
    fn test_first_quarter_is_spread_out() {
        // No two of the first 16 points of a 16x16 array are 4-neighbours
        let rank = generate(16, 16, 1.9, 11);
        let on: Vec<(usize, usize)> = (0..256)
            .filter(|&i| rank[i] < 16)
            .map(|i| (i % 16, i / 16))
            .collect();
        for (a, &(ax, ay)) in on.iter().enumerate() {
            for &(bx, by) in &on[a + 1..] {
                let dx = ax.abs_diff(bx).min(16 - ax.abs_diff(bx));
                let dy = ay.abs_diff(by).min(16 - ay.abs_diff(by));
                assert!(dx + dy > 1, "points ({ax},{ay}) and ({bx},{by}) touch");
            }
        }
    }
}
