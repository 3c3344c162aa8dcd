use std::path::Path;

use mono_dither::dither::DEFAULT_SEED;
use mono_dither::matrix::{
    create_dot_lippens_class_matrix, CURVES, DIFFUSION_KERNELS, DOT_CLASS_MATRICES,
    DOT_DIFFUSION_MATRICES, LIPPENS_COEFFICIENTS, ORDERED_MATRICES, TILE_PATTERNS,
};
use mono_dither::{Algorithm, DitherError, Ditherer, VariableKind};
use serde::Deserialize;

use crate::error::ConfigError;

/// Dither settings loaded from a YAML file.
///
/// Every field is optional in the file. `matrix` names the table of the
/// selected algorithm: an ordered matrix, a diffusion kernel, or a variable
/// kind (`ostromoukhov`, `zhou_fang`). When unset each algorithm uses its
/// usual default.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DitherConfig {
    pub algorithm: String,
    pub matrix: Option<String>,
    pub serpentine: bool,
    pub sigma: f64,
    pub seed: u64,
    /// Fixed threshold; unset picks one from the image.
    pub threshold: Option<f64>,
    pub noise: f64,
    pub dbs_level: u32,
    pub random: bool,
    pub use_riemersma: bool,
    pub curve: String,
    pub pattern: String,
    pub grid: GridConfig,
    pub class_matrix: String,
    pub diffusion_matrix: String,
    pub lippens_coefficients: String,
    /// Decode sRGB input to linear light before dithering.
    pub correct_gamma: bool,
}

/// Cell settings for grid dithering.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    pub min_pixels: usize,
    pub alt: bool,
}

impl Default for DitherConfig {
    fn default() -> Self {
        Self {
            algorithm: "error_diffusion".to_string(),
            matrix: None,
            serpentine: true,
            sigma: 0.0,
            seed: DEFAULT_SEED,
            threshold: None,
            noise: 0.0,
            dbs_level: 3,
            random: false,
            use_riemersma: true,
            curve: "hilbert".to_string(),
            pattern: "4x4".to_string(),
            grid: GridConfig::default(),
            class_matrix: "knuth".to_string(),
            diffusion_matrix: "default".to_string(),
            lippens_coefficients: "coefficients1".to_string(),
            correct_gamma: true,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 4,
            height: 4,
            min_pixels: 0,
            alt: false,
        }
    }
}

impl DitherConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content)?;
        tracing::info!(
            path = %path.display(),
            algorithm = %config.algorithm,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load configuration, falling back to defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(%e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn matrix_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.matrix.as_deref().unwrap_or(default)
    }

    /// Resolve names through the built-in registries.
    pub fn to_algorithm(&self) -> Result<Algorithm, ConfigError> {
        let algorithm = match self.algorithm.as_str() {
            "threshold" => Algorithm::Threshold {
                threshold: self.threshold,
                noise: self.noise,
            },
            "ordered" => Algorithm::Ordered(ORDERED_MATRICES.require(self.matrix_or("bayer8x8"))?),
            "error_diffusion" => Algorithm::ErrorDiffusion(
                DIFFUSION_KERNELS.require(self.matrix_or("floyd_steinberg"))?,
            ),
            "variable" => Algorithm::Variable(parse_variable(self.matrix_or("ostromoukhov"))?),
            "dot_diffusion" => Algorithm::DotDiffusion {
                classes: DOT_CLASS_MATRICES.require(&self.class_matrix)?,
                diffusion: DOT_DIFFUSION_MATRICES.require(&self.diffusion_matrix)?,
            },
            "dbs" => Algorithm::Dbs {
                level: self.dbs_level,
            },
            "kallebach" => Algorithm::KackerAllebach {
                random: self.random,
            },
            "riemersma" => Algorithm::Riemersma {
                curve: CURVES.require(&self.curve)?,
                use_riemersma: self.use_riemersma,
            },
            "pattern" => Algorithm::Pattern(TILE_PATTERNS.require(&self.pattern)?),
            "grid" => Algorithm::Grid {
                width: self.grid.width,
                height: self.grid.height,
                min_pixels: self.grid.min_pixels,
                alt_algorithm: self.grid.alt,
            },
            "dot_lippens" => Algorithm::DotLippens {
                classes: create_dot_lippens_class_matrix(),
                coefficients: LIPPENS_COEFFICIENTS.require(&self.lippens_coefficients)?,
            },
            other => return Err(ConfigError::UnknownAlgorithm(other.to_string())),
        };
        Ok(algorithm)
    }

    /// Build a ditherer carrying the shared options.
    pub fn to_ditherer(&self) -> Result<Ditherer, ConfigError> {
        Ok(Ditherer::new(self.to_algorithm()?)
            .serpentine(self.serpentine)
            .sigma(self.sigma)
            .seed(self.seed))
    }
}

fn parse_variable(name: &str) -> Result<VariableKind, DitherError> {
    match name {
        "ostromoukhov" => Ok(VariableKind::Ostromoukhov),
        "zhou_fang" => Ok(VariableKind::ZhouFang),
        _ => Err(DitherError::UnknownName {
            kind: "variable kind",
            name: name.to_string(),
        }),
    }
}
