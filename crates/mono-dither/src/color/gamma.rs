//! Exact IEC 61966-2-1 transfer functions.

/// Linear segment boundary on the encoded side.
const DECODE_KNEE: f64 = 0.04045;
/// Linear segment boundary on the linear side.
const ENCODE_KNEE: f64 = 0.0031308;

/// BT.709 luma weights, applied to linear channels.
const LUMA_R: f64 = 0.2126;
const LUMA_G: f64 = 0.7152;
const LUMA_B: f64 = 0.0722;

/// Convert an encoded sRGB value (0.0..=1.0) to linear intensity.
///
/// Inputs outside the unit range are clamped.
#[inline]
pub fn gamma_decode(encoded: f64) -> f64 {
    let c = encoded.clamp(0.0, 1.0);
    if c <= DECODE_KNEE {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert a linear intensity (0.0..=1.0) to an encoded sRGB value.
///
/// Inputs outside the unit range are clamped.
#[inline]
pub fn gamma_encode(linear: f64) -> f64 {
    let c = linear.clamp(0.0, 1.0);
    if c <= ENCODE_KNEE {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Weighted luminance of three linear channels.
#[inline]
pub fn luminance(r: f64, g: f64, b: f64) -> f64 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}
