//! Tile patterns: a ladder of stamps from darkest to lightest.

use super::Registry;
use crate::api::{check_dimensions, DitherError};

/// `num_tiles` stamps of `width x height` cells.
///
/// Tile 0 is the darkest stamp and the last tile the lightest. A cell value
/// of `true` is white.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePattern {
    width: usize,
    height: usize,
    tiles: Vec<bool>,
}

impl TilePattern {
    /// Build a pattern from raw stamps, `num_tiles * width * height` cells
    /// stored tile after tile; non-zero cells are white.
    ///
    /// At least two stamps are required. Stamps are taken in the given
    /// order, darkest first; nothing checks that they actually lighten.
    ///
    /// # Example
    ///
    /// ```
    /// use mono_dither::matrix::TilePattern;
    ///
    /// // black, one white cell, white
    /// let p = TilePattern::new(2, 1, 3, &[0, 0, 0, 1, 1, 1]).unwrap();
    /// assert_eq!(p.tile(1), &[false, true]);
    /// assert_eq!(p.level_for(1.0), 2);
    /// assert!(TilePattern::new(2, 1, 3, &[0; 5]).is_err());
    /// ```
    pub fn new(
        width: usize,
        height: usize,
        num_tiles: usize,
        stamps: &[u8],
    ) -> Result<Self, DitherError> {
        check_dimensions(width, height)?;
        if num_tiles < 2 {
            return Err(DitherError::InvalidParameter(format!(
                "tile pattern needs at least 2 tiles, got {num_tiles}"
            )));
        }
        if stamps.len() != num_tiles * width * height {
            return Err(DitherError::InvalidParameter(format!(
                "tile pattern: expected {} cells for {num_tiles} tiles of {width}x{height}, got {}",
                num_tiles * width * height,
                stamps.len()
            )));
        }
        Ok(Self {
            width,
            height,
            tiles: stamps.iter().map(|&c| c != 0).collect(),
        })
    }

    /// Build the `width * height + 1` stamps implied by a fill order.
    ///
    /// The cell with order `k` turns white from tile `k + 1` on, so tile 0
    /// is all black and the last tile all white.
    ///
    /// # Example
    ///
    /// ```
    /// use mono_dither::matrix::TilePattern;
    ///
    /// let p = TilePattern::from_fill_order(2, 1, &[1, 0]).unwrap();
    /// assert_eq!(p.num_tiles(), 3);
    /// assert_eq!(p.tile(1), &[false, true]);
    /// ```
    pub fn from_fill_order(
        width: usize,
        height: usize,
        order: &[i32],
    ) -> Result<Self, DitherError> {
        check_dimensions(width, height)?;
        let cells = width * height;
        if order.len() != cells {
            return Err(DitherError::InvalidParameter(format!(
                "fill order: expected {cells} values, got {}",
                order.len()
            )));
        }
        let mut seen = vec![false; cells];
        for &o in order {
            if o < 0 || o as usize >= cells || seen[o as usize] {
                return Err(DitherError::InvalidParameter(format!(
                    "fill order must be a permutation of 0..{cells}"
                )));
            }
            seen[o as usize] = true;
        }
        Ok(fill(width, height, order))
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of stamps.
    #[inline]
    pub fn num_tiles(&self) -> usize {
        self.tiles.len() / (self.width * self.height)
    }

    /// Cells of stamp `index`, row-major.
    pub fn tile(&self, index: usize) -> &[bool] {
        let n = self.width * self.height;
        &self.tiles[index * n..(index + 1) * n]
    }

    /// Stamp index for an average block intensity in `[0, 1]`.
    #[inline]
    pub fn level_for(&self, average: f64) -> usize {
        let n = self.num_tiles();
        ((average.clamp(0.0, 1.0) * n as f64) as usize).min(n - 1)
    }
}

fn fill(width: usize, height: usize, order: &[i32]) -> TilePattern {
    let cells = width * height;
    let mut tiles = Vec::with_capacity((cells + 1) * cells);
    for level in 0..=cells {
        tiles.extend(order.iter().map(|&o| (o as usize) < level));
    }
    TilePattern {
        width,
        height,
        tiles,
    }
}

/// Built-in tile patterns by name.
pub static TILE_PATTERNS: Registry<TilePattern> = registry!("tile pattern", {
    "2x2" => || fill(2, 2, &[0, 2, 3, 1]),
    "3x3_v1" => || fill(3, 3, &[6, 8, 4, 1, 0, 3, 5, 2, 7]),
    "3x3_v2" => || fill(3, 3, &[0, 7, 3, 6, 5, 2, 4, 1, 8]),
    "3x3_v3" => || fill(3, 3, &[0, 3, 6, 7, 1, 4, 5, 8, 2]),
    "4x4" => || fill(4, 4, &[0, 8, 2, 10, 12, 4, 14, 6, 3, 11, 1, 9, 15, 7, 13, 5]),
    "5x2" => || fill(5, 2, &[0, 6, 2, 8, 4, 5, 3, 9, 1, 7]),
});

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtins_ladder_is_monotonic() {
        for (name, p) in TILE_PATTERNS.iter() {
            let cells = p.width() * p.height();
            assert_eq!(p.num_tiles(), cells + 1, "{name}: tile count");
            for level in 0..p.num_tiles() {
                let white = p.tile(level).iter().filter(|&&c| c).count();
                assert_eq!(white, level, "{name}: tile {level} white cells");
            }
        }
    }

    #[test]
    fn test_builtins_match_fill_order_constructor() {
        let built = TILE_PATTERNS.get("5x2").unwrap();
        let custom = TilePattern::from_fill_order(5, 2, &[0, 6, 2, 8, 4, 5, 3, 9, 1, 7]).unwrap();
        assert_eq!(built, custom);
    }

    #[test]
    fn test_level_for() {
        let p = TILE_PATTERNS.get("2x2").unwrap();
        assert_eq!(p.level_for(0.0), 0);
        assert_eq!(p.level_for(0.39), 1);
        assert_eq!(p.level_for(1.0), 4);
    }

    #[test]
    fn test_raw_stamps() {
        let p = TilePattern::new(1, 2, 2, &[0, 0, 1, 1]).unwrap();
        assert_eq!(p.tile(1), &[true, true]);
        assert!(TilePattern::new(1, 2, 2, &[0, 0, 1]).is_err());
        assert!(TilePattern::new(1, 1, 1, &[0]).is_err());
    }

    #[test]
    fn test_fill_order_must_be_permutation() {
        assert!(TilePattern::from_fill_order(2, 1, &[0, 0]).is_err());
        assert!(TilePattern::from_fill_order(2, 1, &[0]).is_err());
    }
}
