//! Ditherer builder: one entry point for every engine.
//!
//! [`Ditherer`] pairs an [`Algorithm`] (the engine plus its parameter
//! tables) with the shared [`DitherOptions`] and returns an owned
//! [`Bitmap`].

use std::sync::Mutex;

use crate::api::DitherError;
use crate::dither::{
    auto_threshold, dbs_dither, diffuse, dot_diffusion_dither, dot_lippens_dither, grid_dither,
    kallebach_with_seed, ordered_with_options, pattern_dither, riemersma_dither,
    threshold_with_seed, variable_with_options, DitherOptions, VariableKind,
};
use crate::image::LinearImage;
use crate::matrix::{
    Curve, DiffusionKernel, DotClassMatrix, DotDiffusionMatrix, LippensCoefficients,
    OrderedMatrix, SpaceFillingCurve, TilePattern,
};
use crate::output::Bitmap;

/// Engine selection together with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Algorithm {
    /// Global threshold; `None` picks one with
    /// [`auto_threshold`](crate::dither::auto_threshold).
    Threshold { threshold: Option<f64>, noise: f64 },
    /// Ordered dithering; jitter comes from [`Ditherer::sigma`].
    Ordered(OrderedMatrix),
    /// Kernel error diffusion; honours serpentine and sigma.
    ErrorDiffusion(DiffusionKernel),
    /// Variable-coefficient error diffusion; honours serpentine.
    Variable(VariableKind),
    DotDiffusion {
        classes: DotClassMatrix,
        diffusion: DotDiffusionMatrix,
    },
    /// Direct binary search at coarseness `level` (`0..=7`).
    Dbs { level: u32 },
    KackerAllebach { random: bool },
    Riemersma {
        curve: SpaceFillingCurve,
        use_riemersma: bool,
    },
    Pattern(TilePattern),
    Grid {
        width: usize,
        height: usize,
        min_pixels: usize,
        alt_algorithm: bool,
    },
    DotLippens {
        classes: DotClassMatrix,
        coefficients: LippensCoefficients,
    },
}

impl Algorithm {
    /// Names accepted by configuration files, in display order.
    pub const NAMES: [&'static str; 11] = [
        "threshold",
        "ordered",
        "error_diffusion",
        "variable",
        "dot_diffusion",
        "dbs",
        "kallebach",
        "riemersma",
        "pattern",
        "grid",
        "dot_lippens",
    ];

    /// Short name of the engine.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Threshold { .. } => "threshold",
            Self::Ordered(_) => "ordered",
            Self::ErrorDiffusion(_) => "error_diffusion",
            Self::Variable(_) => "variable",
            Self::DotDiffusion { .. } => "dot_diffusion",
            Self::Dbs { .. } => "dbs",
            Self::KackerAllebach { .. } => "kallebach",
            Self::Riemersma { .. } => "riemersma",
            Self::Pattern(_) => "pattern",
            Self::Grid { .. } => "grid",
            Self::DotLippens { .. } => "dot_lippens",
        }
    }
}

/// High-level dithering builder.
///
/// - Configuration methods consume and return `self`
/// - [`dither()`](Self::dither) takes `&self`, so one ditherer serves many
///   images
/// - A Riemersma curve is built on first use and reused while the image
///   size stays the same
///
/// # Example
///
/// ```
/// use mono_dither::matrix::DIFFUSION_KERNELS;
/// use mono_dither::{Algorithm, Ditherer, LinearImage};
///
/// let kernel = DIFFUSION_KERNELS.require("atkinson").unwrap();
/// let ditherer = Ditherer::new(Algorithm::ErrorDiffusion(kernel)).serpentine(false);
///
/// let image = LinearImage::from_fn(8, 8, |x, _| x as f64 / 7.0).unwrap();
/// let bitmap = ditherer.dither(&image).unwrap();
/// assert_eq!(bitmap.width(), 8);
/// ```
#[derive(Debug)]
pub struct Ditherer {
    algorithm: Algorithm,
    options: DitherOptions,
    curve_cache: Mutex<Option<Curve>>,
}

impl Ditherer {
    /// Create a ditherer with default [`DitherOptions`].
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            options: DitherOptions::default(),
            curve_cache: Mutex::new(None),
        }
    }

    /// Replace all shared options at once.
    #[inline]
    pub fn options(mut self, options: DitherOptions) -> Self {
        self.options = options;
        self
    }

    /// Set serpentine scanning mode.
    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.options = self.options.serpentine(enabled);
        self
    }

    /// Set jitter standard deviation.
    #[inline]
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.options = self.options.sigma(sigma);
        self
    }

    /// Set the noise seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.options = self.options.seed(seed);
        self
    }

    /// The selected engine.
    #[inline]
    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// Dither `image` into a new [`Bitmap`].
    ///
    /// Fails only for parameters that cannot be applied to this image: a
    /// grid with a zero-sized cell, or a curve that cannot cover the image.
    pub fn dither(&self, image: &LinearImage) -> Result<Bitmap, DitherError> {
        let mut out = vec![0u8; image.len()];
        tracing::debug!(
            algorithm = self.algorithm.name(),
            width = image.width(),
            height = image.height(),
            "dithering"
        );

        match &self.algorithm {
            Algorithm::Threshold { threshold, noise } => {
                let t = threshold.unwrap_or_else(|| auto_threshold(image));
                threshold_with_seed(image, t, *noise, self.options.seed, &mut out);
            }
            Algorithm::Ordered(matrix) => {
                ordered_with_options(image, matrix, &self.options, &mut out);
            }
            Algorithm::ErrorDiffusion(kernel) => diffuse(image, kernel, &self.options, &mut out),
            Algorithm::Variable(kind) => {
                variable_with_options(image, *kind, &self.options, &mut out);
            }
            Algorithm::DotDiffusion { classes, diffusion } => {
                dot_diffusion_dither(image, classes, diffusion, &mut out);
            }
            Algorithm::Dbs { level } => dbs_dither(image, *level, &mut out),
            Algorithm::KackerAllebach { random } => {
                kallebach_with_seed(image, *random, self.options.seed, &mut out);
            }
            Algorithm::Riemersma {
                curve,
                use_riemersma,
            } => {
                let mut cache = self
                    .curve_cache
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                let fits = cache
                    .as_ref()
                    .is_some_and(|c| c.width() == image.width() && c.height() == image.height());
                if !fits {
                    *cache = Some(curve.create_curve(image.width(), image.height())?);
                }
                if let Some(c) = cache.as_ref() {
                    riemersma_dither(image, c, *use_riemersma, &mut out);
                }
            }
            Algorithm::Pattern(pattern) => pattern_dither(image, pattern, &mut out),
            Algorithm::Grid {
                width,
                height,
                min_pixels,
                alt_algorithm,
            } => {
                if *width == 0 || *height == 0 {
                    return Err(DitherError::InvalidParameter(format!(
                        "grid cell must be at least 1x1, got {width}x{height}"
                    )));
                }
                grid_dither(image, *width, *height, *min_pixels, *alt_algorithm, &mut out);
            }
            Algorithm::DotLippens {
                classes,
                coefficients,
            } => dot_lippens_dither(image, classes, coefficients, &mut out),
        }

        Ok(Bitmap::new(out, image.width(), image.height()))
    }
}
