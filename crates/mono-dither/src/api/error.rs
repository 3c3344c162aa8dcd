//! Unified error type for the mono-dither public API.
//!
//! Errors only arise at construction boundaries: image allocation, custom
//! matrix/curve parameters, and registry lookups. The engines themselves are
//! infallible once their inputs exist.

use thiserror::Error;

/// Error returned by constructors and registry lookups.
///
/// # Example
///
/// ```
/// use mono_dither::{DitherError, OrderedMatrix};
///
/// let err = OrderedMatrix::new(2, 2, 0.0, &[0, 1, 2, 3]).unwrap_err();
/// assert!(matches!(err, DitherError::InvalidDivisor(_)));
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DitherError {
    /// Width or height is zero.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimension { width: usize, height: usize },

    /// A matrix divisor is zero, negative or not finite.
    #[error("divisor must be positive, got {0}")]
    InvalidDivisor(f64),

    /// The pixel buffer could not be allocated.
    #[error("failed to allocate buffer for {0} pixels")]
    Allocation(usize),

    /// A parameter table is malformed (wrong length, bad values, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A registry has no entry under the requested name.
    #[error("unknown {kind} '{name}'")]
    UnknownName { kind: &'static str, name: String },
}

/// Reject zero-sized grids. Shared by every constructor taking dimensions.
pub(crate) fn check_dimensions(width: usize, height: usize) -> Result<(), DitherError> {
    if width == 0 || height == 0 {
        return Err(DitherError::InvalidDimension { width, height });
    }
    Ok(())
}

/// Reject a raw table whose length does not match `width * height`.
pub(crate) fn check_len(
    what: &str,
    width: usize,
    height: usize,
    len: usize,
) -> Result<(), DitherError> {
    if width * height != len {
        return Err(DitherError::InvalidParameter(format!(
            "{what}: expected {} values for {width}x{height}, got {len}",
            width * height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = DitherError::InvalidDimension {
            width: 0,
            height: 3,
        };
        assert_eq!(err.to_string(), "invalid dimensions 0x3");

        let err = DitherError::UnknownName {
            kind: "curve",
            name: "zigzag".into(),
        };
        assert_eq!(err.to_string(), "unknown curve 'zigzag'");
    }

    #[test]
    fn test_check_len() {
        assert!(check_len("kernel", 3, 2, 6).is_ok());
        assert!(matches!(
            check_len("kernel", 3, 2, 5),
            Err(DitherError::InvalidParameter(_))
        ));
    }
}
