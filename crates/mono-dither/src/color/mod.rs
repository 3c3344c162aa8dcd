//! sRGB transfer functions.
//!
//! Every engine works on linear light intensity. Callers feeding 8-bit sRGB
//! data go through [`srgb8_to_linear`] (table driven); callers building their
//! own pipelines can use the exact [`gamma_decode`] / [`gamma_encode`] pair.
//!
//! # Example
//!
//! ```
//! use mono_dither::color::{gamma_decode, gamma_encode};
//!
//! let linear = gamma_decode(0.5);
//! assert!((gamma_encode(linear) - 0.5).abs() < 1e-9);
//! ```

mod gamma;
mod lut;

pub use gamma::{gamma_decode, gamma_encode, luminance};
pub use lut::srgb8_to_linear;
