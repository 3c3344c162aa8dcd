//! Space-filling curves generated from L-system grammars.
//!
//! A [`SpaceFillingCurve`] describes the grammar; [`SpaceFillingCurve::create_curve`]
//! expands it to the smallest order that covers a rectangle and returns the
//! visiting order of every pixel in that rectangle as a [`Curve`].
//!
//! Turtle alphabet: `F` steps forward and visits the new cell, `+` and `-`
//! turn by 90 degrees, every other symbol is rewritten by its rule and is
//! otherwise inert.

use std::borrow::Cow;

use super::Registry;
use crate::api::{check_dimensions, DitherError};

/// Largest curve square side that [`SpaceFillingCurve::create_curve`] accepts.
pub const MAX_CURVE_DIM: usize = 1 << 15;

/// How a rectangle smaller than the curve square is placed inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdjustCurve {
    /// Top-left corner.
    #[default]
    CenterNone,
    /// Centred horizontally.
    CenterX,
    /// Centred vertically.
    CenterY,
    /// Centred on both axes.
    CenterXY,
}

impl AdjustCurve {
    fn offsets(self, dim: usize, width: usize, height: usize) -> (usize, usize) {
        let ox = (dim - width) / 2;
        let oy = (dim - height) / 2;
        match self {
            Self::CenterNone => (0, 0),
            Self::CenterX => (ox, 0),
            Self::CenterY => (0, oy),
            Self::CenterXY => (ox, oy),
        }
    }
}

/// L-system description of a space-filling curve.
///
/// At order `n` the curve square has side `base^(n + exp_adjust) + add_adjust`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceFillingCurve {
    base: usize,
    add_adjust: i64,
    exp_adjust: u32,
    axiom: Cow<'static, str>,
    rules: Cow<'static, [(char, &'static str)]>,
    orientation: (i64, i64),
    adjust: AdjustCurve,
}

/// Visiting order of every pixel of a rectangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curve {
    points: Vec<(usize, usize)>,
    width: usize,
    height: usize,
    order: u32,
    dim: usize,
}

impl Curve {
    /// `(x, y)` positions in visiting order; each pixel appears once.
    #[inline]
    pub fn points(&self) -> &[(usize, usize)] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of rewriting steps used.
    #[inline]
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Side of the full curve square.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl SpaceFillingCurve {
    /// Describe a custom curve.
    ///
    /// `rules` map a symbol to its replacement and may not redefine the
    /// turtle symbols. `orientation` is the initial heading and must be a
    /// unit step along one axis.
    ///
    /// # Example
    ///
    /// ```
    /// use mono_dither::matrix::{AdjustCurve, SpaceFillingCurve};
    ///
    /// let hilbert = SpaceFillingCurve::new(
    ///     2,
    ///     0,
    ///     0,
    ///     "A",
    ///     &[('A', "-BF+AFA+FB-"), ('B', "+AF-BFB-FA+")],
    ///     (1, 0),
    ///     AdjustCurve::CenterNone,
    /// )
    /// .unwrap();
    /// let curve = hilbert.create_curve(4, 4).unwrap();
    /// assert_eq!(curve.len(), 16);
    /// ```
    pub fn new(
        base: usize,
        add_adjust: i64,
        exp_adjust: u32,
        axiom: &str,
        rules: &[(char, &'static str)],
        orientation: (i64, i64),
        adjust: AdjustCurve,
    ) -> Result<Self, DitherError> {
        if base < 2 {
            return Err(DitherError::InvalidParameter(format!(
                "curve base must be at least 2, got {base}"
            )));
        }
        if orientation.0.abs() + orientation.1.abs() != 1 {
            return Err(DitherError::InvalidParameter(format!(
                "curve orientation must be an axis step, got {orientation:?}"
            )));
        }
        if let Some(&(symbol, _)) = rules.iter().find(|(c, _)| matches!(c, 'F' | '+' | '-')) {
            return Err(DitherError::InvalidParameter(format!(
                "curve rule may not redefine turtle symbol '{symbol}'"
            )));
        }
        Ok(Self {
            base,
            add_adjust,
            exp_adjust,
            axiom: Cow::Owned(axiom.to_string()),
            rules: Cow::Owned(rules.to_vec()),
            orientation,
            adjust,
        })
    }

    /// Same curve placed differently inside its square.
    pub fn with_adjust(mut self, adjust: AdjustCurve) -> Self {
        self.adjust = adjust;
        self
    }

    /// Side of the curve square at `order`, saturating on overflow.
    fn side(&self, order: u32) -> usize {
        let side = (self.base as u128)
            .checked_pow(order + self.exp_adjust)
            .map(|p| p as i128 + self.add_adjust as i128)
            .unwrap_or(i128::MAX);
        side.clamp(0, usize::MAX as i128) as usize
    }

    /// Expand the curve over a `width x height` rectangle.
    ///
    /// Uses the smallest order `n >= 1` whose square covers both sides.
    /// The result is costly to build and can be reused for every image of
    /// the same size.
    pub fn create_curve(&self, width: usize, height: usize) -> Result<Curve, DitherError> {
        check_dimensions(width, height)?;
        let need = width.max(height);
        if need > MAX_CURVE_DIM {
            return Err(DitherError::InvalidParameter(format!(
                "curve side {need} exceeds the maximum of {MAX_CURVE_DIM}"
            )));
        }
        let mut order = 1;
        while self.side(order) < need {
            order += 1;
        }

        // First walk: bounding box of the unclipped curve
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (0i64, 0i64, 0i64, 0i64);
        self.walk(order, |x, y| {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        });
        let dim = ((max_x - min_x).max(max_y - min_y) + 1) as usize;
        if dim < need {
            return Err(DitherError::InvalidParameter(format!(
                "curve square {dim} at order {order} does not cover {width}x{height}"
            )));
        }
        let (ox, oy) = self.adjust.offsets(dim, width, height);

        // Second walk: keep the points inside the rectangle
        let mut seen = vec![false; width * height];
        let mut points = Vec::with_capacity(width * height);
        let mut duplicate = false;
        self.walk(order, |x, y| {
            let (x, y) = ((x - min_x) as usize, (y - min_y) as usize);
            if x < ox || y < oy {
                return;
            }
            let (x, y) = (x - ox, y - oy);
            if x < width && y < height {
                let i = y * width + x;
                duplicate |= seen[i];
                seen[i] = true;
                points.push((x, y));
            }
        });
        if duplicate || points.len() != width * height {
            return Err(DitherError::InvalidParameter(format!(
                "curve does not visit each of the {width}x{height} pixels exactly once"
            )));
        }

        tracing::debug!(width, height, order, dim, "created space-filling curve");
        Ok(Curve {
            points,
            width,
            height,
            order,
            dim,
        })
    }

    /// Run the turtle over the order-`order` expansion, visiting the start
    /// cell and the cell after every step.
    fn walk<F: FnMut(i64, i64)>(&self, order: u32, mut visit: F) {
        let mut turtle = Turtle {
            rules: &self.rules,
            x: 0,
            y: 0,
            dx: self.orientation.0,
            dy: self.orientation.1,
        };
        visit(0, 0);
        turtle.expand(&self.axiom, order, &mut visit);
    }
}

struct Turtle<'a> {
    rules: &'a [(char, &'static str)],
    x: i64,
    y: i64,
    dx: i64,
    dy: i64,
}

impl Turtle<'_> {
    fn expand<F: FnMut(i64, i64)>(&mut self, symbols: &str, depth: u32, visit: &mut F) {
        for c in symbols.chars() {
            match c {
                'F' => {
                    self.x += self.dx;
                    self.y += self.dy;
                    visit(self.x, self.y);
                }
                '+' => (self.dx, self.dy) = (-self.dy, self.dx),
                '-' => (self.dx, self.dy) = (self.dy, -self.dx),
                _ if depth > 0 => {
                    if let Some(&(_, rule)) = self.rules.iter().find(|(s, _)| *s == c) {
                        self.expand(rule, depth - 1, visit);
                    }
                }
                _ => {}
            }
        }
    }
}

const fn builtin(
    base: usize,
    exp_adjust: u32,
    axiom: &'static str,
    rules: &'static [(char, &'static str)],
    adjust: AdjustCurve,
) -> SpaceFillingCurve {
    SpaceFillingCurve {
        base,
        add_adjust: 0,
        exp_adjust,
        axiom: Cow::Borrowed(axiom),
        rules: Cow::Borrowed(rules),
        orientation: (1, 0),
        adjust,
    }
}

const HILBERT: SpaceFillingCurve = builtin(
    2,
    0,
    "A",
    &[('A', "-BF+AFA+FB-"), ('B', "+AF-BFB-FA+")],
    AdjustCurve::CenterNone,
);

const HILBERT_MOD: SpaceFillingCurve = builtin(
    2,
    1,
    "LFL+F+LFL",
    &[('L', "-RF+LFL+FR-"), ('R', "+LF-RFR-FL+")],
    AdjustCurve::CenterNone,
);

const PEANO: SpaceFillingCurve = builtin(
    3,
    0,
    "X",
    &[
        ('X', "XFYFX+F+YFXFY-F-XFYFX"),
        ('Y', "YFXFY-F-XFYFX+F+YFXFY"),
    ],
    AdjustCurve::CenterNone,
);

const FASS0: SpaceFillingCurve = builtin(
    3,
    0,
    "L",
    &[
        ('L', "LF+RFR+FL-F-LFLFL-FRFR+"),
        ('R', "-LFLF+RFRFR+F+RF-LFL-FR"),
    ],
    AdjustCurve::CenterNone,
);

const FASS1: SpaceFillingCurve = builtin(
    4,
    0,
    "L",
    &[
        ('L', "LFLF+RFR+FLFL-FRF-LFL-FR+F+RF-LFL-FRFRFR+"),
        ('R', "-LFLFLF+RFR+FL-F-LF+RFR+FLF+RFRF-LFL-FRFR"),
    ],
    AdjustCurve::CenterNone,
);

const FASS2: SpaceFillingCurve = builtin(
    4,
    0,
    "L",
    &[
        ('L', "LF+RFR+FL-FRF-LFL-FR+F+RF-LFL-FRF-LF+RFR+FL"),
        ('R', "RF-LFL-FR+FLF+RFR+FL-F-LF+RFR+FLF+RF-LFL-FR"),
    ],
    AdjustCurve::CenterNone,
);

const GOSPER: SpaceFillingCurve = builtin(
    5,
    0,
    "L",
    &[
        (
            'L',
            "LF+RFR+FL-F-LF+RFR+FL-F-LFLFL-FR+F+RF-LFL-FRF-LFLF+RFRFR+F+RF-LFL-FR+",
        ),
        (
            'R',
            "-LF+RFR+FL-F-LFLFL-FRFR+FLF+RFR+FL-F-LF+RFRFR+F+RF-LFL-FR+F+RF-LFL-FR",
        ),
    ],
    AdjustCurve::CenterNone,
);

const FASS_SPIRAL: SpaceFillingCurve = builtin(
    5,
    0,
    "L",
    &[
        (
            'L',
            "LF-L+FLF-L+FL+FLF-L+FL+FLF-L+FL+FL+FLF-LF-LF-L+FLF-LF-L+FLF-LF-L+FLF-L+FL",
        ),
        (
            'R',
            "RF-R+FRF-R+FR+FRF-R+FR+FRF-R+FR+FR+FRF-RF-RF-R+FRF-RF-R+FRF-RF-R+FRF-R+FR",
        ),
    ],
    AdjustCurve::CenterXY,
);

/// Built-in curves by name.
pub static CURVES: Registry<SpaceFillingCurve> = registry!("curve", {
    "hilbert" => || HILBERT,
    "hilbert_mod" => || HILBERT_MOD,
    "peano" => || PEANO,
    "fass0" => || FASS0,
    "fass1" => || FASS1,
    "fass2" => || FASS2,
    "gosper" => || GOSPER,
    "fass_spiral" => || FASS_SPIRAL,
});

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn is_step(a: (usize, usize), b: (usize, usize)) -> bool {
        a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
    }

    #[test]
    fn test_hilbert_order_one() {
        let curve = HILBERT.create_curve(2, 2).unwrap();
        assert_eq!(curve.order(), 1);
        assert_eq!(curve.dim(), 2);
        assert_eq!(curve.len(), 4);
        for pair in curve.points().windows(2) {
            assert!(is_step(pair[0], pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_full_squares_are_continuous_paths() {
        for (name, side) in [("hilbert", 8), ("peano", 9), ("hilbert_mod", 8)] {
            let curve = CURVES.get(name).unwrap().create_curve(side, side).unwrap();
            assert_eq!(curve.dim(), side, "{name}: square side");
            for pair in curve.points().windows(2) {
                assert!(is_step(pair[0], pair[1]), "{name}: jump {:?} -> {:?}", pair[0], pair[1]);
            }
        }
    }

    #[test]
    fn test_order_tracks_size() {
        assert_eq!(HILBERT.create_curve(5, 3).unwrap().order(), 3);
        assert_eq!(PEANO.create_curve(4, 1).unwrap().order(), 2);
        assert_eq!(HILBERT_MOD.create_curve(3, 3).unwrap().order(), 1);
    }

    #[test]
    fn test_centering_shifts_window() {
        let plain = HILBERT.create_curve(2, 4).unwrap();
        let centred = HILBERT.clone().with_adjust(AdjustCurve::CenterX).create_curve(2, 4).unwrap();
        assert_eq!(plain.len(), 8);
        assert_eq!(centred.len(), 8);
        assert_ne!(plain.points(), centred.points());
    }

    #[test]
    fn test_rejects_oversized_request() {
        let err = HILBERT.create_curve(MAX_CURVE_DIM + 1, 1).unwrap_err();
        assert!(matches!(err, DitherError::InvalidParameter(_)));
    }

    #[test]
    fn test_new_validates() {
        let bad_base = SpaceFillingCurve::new(1, 0, 0, "A", &[], (1, 0), AdjustCurve::CenterNone);
        assert!(bad_base.is_err());
        let bad_heading =
            SpaceFillingCurve::new(2, 0, 0, "A", &[], (1, 1), AdjustCurve::CenterNone);
        assert!(bad_heading.is_err());
        let bad_rule =
            SpaceFillingCurve::new(2, 0, 0, "A", &[('F', "FF")], (1, 0), AdjustCurve::CenterNone);
        assert!(bad_rule.is_err());
    }

    #[test]
    fn test_broken_grammar_is_rejected() {
        // Moves in a straight line: never covers a square
        let line = SpaceFillingCurve::new(2, 0, 0, "A", &[('A', "AFA")], (1, 0), AdjustCurve::CenterNone)
            .unwrap();
        assert!(line.create_curve(2, 2).is_err());
    }
}
