//! Output types for the dithering engines.
//!
//! Engines write one byte per pixel into a caller-provided buffer:
//! [`BLACK`] (`0x00`) or [`WHITE`] (`0xFF`). [`Bitmap`] wraps such a buffer
//! with its dimensions and offers boolean and packed 1-bit-per-pixel views.

mod bitmap;

pub use bitmap::{Bitmap, BLACK, WHITE};
