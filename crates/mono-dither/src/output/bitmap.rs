//! Bitmap: the owned result of a dither run.

/// Output value of a black pixel.
pub const BLACK: u8 = 0x00;
/// Output value of a white pixel.
pub const WHITE: u8 = 0xFF;

/// A width x height grid of [`BLACK`] / [`WHITE`] bytes in row-major order.
///
/// # Example
///
/// ```
/// use mono_dither::{Bitmap, BLACK, WHITE};
///
/// let bitmap = Bitmap::new(vec![BLACK, WHITE, WHITE, BLACK], 2, 2);
/// assert_eq!(bitmap.black_count(), 2);
/// assert_eq!(bitmap.to_bools(), vec![false, true, true, false]);
/// assert_eq!(bitmap.pack_rows(), vec![0b1000_0000, 0b0100_0000]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pixels: Vec<u8>,
    width: usize,
    height: usize,
}

impl Bitmap {
    /// Wrap an engine output buffer.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `pixels.len() == width * height`.
    pub fn new(pixels: Vec<u8>, width: usize, height: usize) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width * height,
            "pixels length ({}) must match width * height ({}x{}={})",
            pixels.len(),
            width,
            height,
            width * height,
        );
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Returns the raw 0/255 bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
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

    /// True if the pixel at `(x, y)` is white.
    #[inline]
    pub fn is_white(&self, x: usize, y: usize) -> bool {
        self.pixels[y * self.width + x] == WHITE
    }

    /// One boolean per pixel, `true` for white.
    pub fn to_bools(&self) -> Vec<bool> {
        self.pixels.iter().map(|&p| p == WHITE).collect()
    }

    /// Number of black pixels.
    pub fn black_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p == BLACK).count()
    }

    /// Bytes per packed row: `ceil(width / 8)`.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.width.div_ceil(8)
    }

    /// Pack into 1 bit per pixel, MSB first, one padded byte run per row.
    ///
    /// A set bit is a black dot, which is what thermal print heads expect.
    /// Padding bits at the end of a row are zero.
    pub fn pack_rows(&self) -> Vec<u8> {
        let stride = self.row_stride();
        let mut packed = vec![0u8; stride * self.height];
        for (y, row) in self.pixels.chunks(self.width).enumerate() {
            for (x, &p) in row.iter().enumerate() {
                if p == BLACK {
                    packed[y * stride + x / 8] |= 0x80 >> (x % 8);
                }
            }
        }
        packed
    }

    /// Consume the bitmap, returning the raw bytes.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}
