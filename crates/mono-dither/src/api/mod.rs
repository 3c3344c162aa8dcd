//! Public API for the mono-dither crate.
//!
//! This module provides the high-level API: the [`Ditherer`] builder, the
//! [`Algorithm`] selection enum and the [`DitherError`] error type.

mod builder;
mod error;

pub use builder::{Algorithm, Ditherer};
pub use error::DitherError;
pub(crate) use error::{check_dimensions, check_len};
