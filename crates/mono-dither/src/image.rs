//! Linear-light greyscale image store.
//!
//! [`LinearImage`] is the single input type of every engine: a row-major grid
//! of intensities in `[0.0, 1.0]`, where `0.0` is black and `1.0` is white,
//! in linear (gamma-decoded) light.

use crate::api::{check_dimensions, DitherError};
use crate::color::{gamma_decode, luminance, srgb8_to_linear};

/// Owned greyscale image in linear light.
///
/// Pixels are written during setup with [`set_pixel`](Self::set_pixel) and
/// then borrowed read-only by an engine.
///
/// # Preconditions
///
/// Coordinates passed to [`set_pixel`](Self::set_pixel) and
/// [`get_pixel`](Self::get_pixel) must lie in `[0, width) x [0, height)`.
///
/// # Example
///
/// ```
/// use mono_dither::LinearImage;
///
/// let mut image = LinearImage::new(2, 1).unwrap();
/// image.set_pixel(0, 0, 255, 255, 255, true);
/// image.set_pixel(1, 0, 0, 0, 0, true);
/// assert!((image.get_pixel(0, 0) - 1.0).abs() < 1e-9);
/// assert_eq!(image.get_pixel(1, 0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearImage {
    width: usize,
    height: usize,
    pixels: Vec<f64>,
}

impl LinearImage {
    /// Allocate a black (all zero) image.
    ///
    /// Fails with [`DitherError::InvalidDimension`] for a zero width or
    /// height and with [`DitherError::Allocation`] when the buffer cannot be
    /// reserved.
    pub fn new(width: usize, height: usize) -> Result<Self, DitherError> {
        check_dimensions(width, height)?;
        let len = width
            .checked_mul(height)
            .ok_or(DitherError::Allocation(usize::MAX))?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| DitherError::Allocation(len))?;
        pixels.resize(len, 0.0);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build an image from a closure returning the linear value at `(x, y)`.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self, DitherError>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut image = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                image.pixels[y * width + x] = f(x, y).clamp(0.0, 1.0);
            }
        }
        Ok(image)
    }

    /// Build an image from row-major linear values.
    pub fn from_luma(width: usize, height: usize, values: &[f64]) -> Result<Self, DitherError> {
        crate::api::check_len("image", width, height, values.len())?;
        Self::from_fn(width, height, |x, y| values[y * width + x])
    }

    /// Store an 8-bit RGB pixel as a single linear luminance value.
    ///
    /// With `correct_gamma` each channel is decoded through the sRGB transfer
    /// function first; otherwise the channels are taken as already linear.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8, correct_gamma: bool) {
        debug_assert!(
            x < self.width && y < self.height,
            "set_pixel({x}, {y}) outside {}x{}",
            self.width,
            self.height
        );
        let (r, g, b) = if correct_gamma {
            (srgb8_to_linear(r), srgb8_to_linear(g), srgb8_to_linear(b))
        } else {
            (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
        };
        self.pixels[y * self.width + x] = luminance(r, g, b).clamp(0.0, 1.0);
    }

    /// Store a floating-point sRGB-encoded grey value, decoding it if asked.
    #[inline]
    pub fn set_value(&mut self, x: usize, y: usize, value: f64, correct_gamma: bool) {
        debug_assert!(x < self.width && y < self.height);
        let value = if correct_gamma {
            gamma_decode(value)
        } else {
            value.clamp(0.0, 1.0)
        };
        self.pixels[y * self.width + x] = value;
    }

    /// Linear value at `(x, y)`.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> f64 {
        debug_assert!(
            x < self.width && y < self.height,
            "get_pixel({x}, {y}) outside {}x{}",
            self.width,
            self.height
        );
        self.pixels[y * self.width + x]
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always false; zero-sized images cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Row-major pixel values.
    #[inline]
    pub fn pixels(&self) -> &[f64] {
        &self.pixels
    }

    /// Mean intensity over all pixels.
    pub fn mean(&self) -> f64 {
        self.pixels.iter().sum::<f64>() / self.pixels.len() as f64
    }
}
