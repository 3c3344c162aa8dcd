//! 8-bit gamma lookup table generated at compile time by build.rs.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Decode an 8-bit sRGB code value to linear intensity.
#[inline]
pub fn srgb8_to_linear(code: u8) -> f64 {
    SRGB8_TO_LINEAR[code as usize]
}
