//! Shared engine options.
//!
//! [`DitherOptions`] carries the settings that several engines share:
//! serpentine scanning, jitter strength and the noise seed.

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 0x6469_7468;

/// Configuration shared by the jittered and raster-scan engines.
///
/// # Defaults
///
/// - Serpentine scanning: enabled
/// - Sigma: `0.0` (no jitter)
/// - Seed: [`DEFAULT_SEED`]
///
/// # Example
///
/// ```
/// use mono_dither::dither::DitherOptions;
///
/// let options = DitherOptions::new().serpentine(false).sigma(0.05).seed(7);
/// assert!(!options.serpentine);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DitherOptions {
    /// Alternate the column direction on odd rows, mirroring the kernel.
    ///
    /// Default: `true`
    pub serpentine: bool,

    /// Standard deviation of the Gaussian jitter added to each threshold
    /// decision. Typical values are `0.0..=0.2`.
    ///
    /// Default: `0.0`
    pub sigma: f64,

    /// Seed of the noise generator. Runs with the same seed and inputs
    /// produce the same output.
    pub seed: u64,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            serpentine: true,
            sigma: 0.0,
            seed: DEFAULT_SEED,
        }
    }
}

impl DitherOptions {
    /// Create new dither options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set serpentine scanning mode.
    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    /// Set the jitter standard deviation. Negative values count as zero.
    #[inline]
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma.max(0.0);
        self
    }

    /// Set the noise seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let opts = DitherOptions::default();
        assert!(opts.serpentine, "serpentine should default to true");
        assert_eq!(opts.sigma, 0.0, "jitter should default to off");
        assert_eq!(opts.seed, DEFAULT_SEED);
    }

    #[test]
    fn test_builder_chaining() {
        let opts = DitherOptions::new().serpentine(false).sigma(0.1).seed(3);
        assert!(!opts.serpentine);
        assert_eq!(opts.sigma, 0.1);
        assert_eq!(opts.seed, 3);
    }

    #[test]
    fn test_negative_sigma_is_zero() {
        assert_eq!(DitherOptions::new().sigma(-1.0).sigma, 0.0);
    }
}
