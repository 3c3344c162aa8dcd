//! Parameter tables shared by the engines.
//!
//! Every family of built-in tables is exposed through a [`Registry`]: a
//! static list of `(name, constructor)` pairs. Custom tables are built with
//! each type's `new` constructor from raw, row-major arrays.
//!
//! | Family | Type | Registry |
//! |--------|------|----------|
//! | Error diffusion | [`DiffusionKernel`] | [`DIFFUSION_KERNELS`] |
//! | Ordered | [`OrderedMatrix`] | [`ORDERED_MATRICES`] |
//! | Dot diffusion classes | [`DotClassMatrix`] | [`DOT_CLASS_MATRICES`] |
//! | Dot diffusion weights | [`DotDiffusionMatrix`] | [`DOT_DIFFUSION_MATRICES`] |
//! | Tile patterns | [`TilePattern`] | [`TILE_PATTERNS`] |
//! | Space-filling curves | [`SpaceFillingCurve`] | [`CURVES`] |
//! | Lippens coefficients | [`LippensCoefficients`] | [`LIPPENS_COEFFICIENTS`] |
//!
//! # Example
//!
//! ```
//! use mono_dither::matrix::DIFFUSION_KERNELS;
//!
//! let fs = DIFFUSION_KERNELS.get("floyd_steinberg").unwrap();
//! assert_eq!(fs.divisor(), 16.0);
//! assert!(DIFFUSION_KERNELS.get("nope").is_none());
//! ```

/// Build a `static` [`Registry`] from `"name" => constructor` pairs.
macro_rules! registry {
    ($kind:expr, { $($name:literal => $build:expr),* $(,)? }) => {
        $crate::matrix::Registry {
            kind: $kind,
            entries: &[$($crate::matrix::Entry { name: $name, build: $build }),*],
        }
    };
}

mod curve;
mod diffusion;
mod dot;
mod lippens;
mod ordered;
mod pattern;
pub(crate) mod void_cluster;

pub use curve::{AdjustCurve, Curve, SpaceFillingCurve, CURVES, MAX_CURVE_DIM};
pub use diffusion::*;
pub use dot::{DotClassMatrix, DotDiffusionMatrix, DOT_CLASS_MATRICES, DOT_DIFFUSION_MATRICES};
pub use lippens::{create_dot_lippens_class_matrix, LippensCoefficients, LIPPENS_COEFFICIENTS};
pub use ordered::{
    interleaved_gradient_noise, interleaved_gradient_noise_step, matrix_from_image,
    variable_2x2, variable_4x4, OrderedMatrix, ORDERED_MATRICES,
};
pub use pattern::{TilePattern, TILE_PATTERNS};

use crate::api::DitherError;

/// Registry entry: a name and a constructor for the table it names.
pub struct Entry<T> {
    pub(crate) name: &'static str,
    pub(crate) build: fn() -> T,
}

/// A catalogue of named built-in tables.
///
/// Lookups construct a fresh owned value; generated tables that are costly to
/// build cache themselves internally.
pub struct Registry<T: 'static> {
    pub(crate) kind: &'static str,
    pub(crate) entries: &'static [Entry<T>],
}

impl<T: 'static> Registry<T> {
    /// What the registry holds, e.g. `"diffusion kernel"`.
    #[inline]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Build the table registered under `name`.
    pub fn get(&self, name: &str) -> Option<T> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| (e.build)())
    }

    /// Like [`get`](Self::get) but reports unknown names as an error.
    pub fn require(&self, name: &str) -> Result<T, DitherError> {
        self.get(name).ok_or_else(|| DitherError::UnknownName {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    /// All registered names in catalogue order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    /// Build every table, paired with its name.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, T)> + '_ {
        self.entries.iter().map(|e| (e.name, (e.build)()))
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the registry has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rank the cells of a grid by a key, lowest key first, ties by raster index.
///
/// Returns `rank[i]` for every cell `i`. Used by the generated ordered and
/// class matrices.
pub(crate) fn rank_by<K, F>(len: usize, mut key: F) -> Vec<i32>
where
    K: PartialOrd,
    F: FnMut(usize) -> K,
{
    let keys: Vec<K> = (0..len).map(&mut key).collect();
    let mut order: Vec<usize> = (0..len).collect();
    order.sort_by(|&a, &b| {
        keys[a]
            .partial_cmp(&keys[b])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    let mut rank = vec![0i32; len];
    for (r, &i) in order.iter().enumerate() {
        rank[i] = r as i32;
    }
    rank
}
