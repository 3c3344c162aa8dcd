use std::path::PathBuf;

use mono_dither::DitherError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Invalid dither settings: {0}")]
    Dither(#[from] DitherError),
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG decode error: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("PNG encode error: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("Unsupported PNG color type: {0:?}")]
    UnsupportedColor(png::ColorType),

    #[error("Dither error: {0}")]
    Dither(#[from] DitherError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_unknown_algorithm() {
        let error = ConfigError::UnknownAlgorithm("sepia".to_string());
        assert_eq!(error.to_string(), "Unknown algorithm: sepia");
    }

    #[test]
    fn test_config_error_from_dither() {
        let error: ConfigError = DitherError::UnknownName {
            kind: "curve",
            name: "zigzag".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "Invalid dither settings: unknown curve 'zigzag'");
    }

    #[test]
    fn test_config_error_read() {
        let error = ConfigError::Read {
            path: PathBuf::from("missing.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(error.to_string(), "Failed to read config missing.yaml: not found");
    }

    #[test]
    fn test_image_error_unsupported() {
        let error = ImageError::UnsupportedColor(png::ColorType::Indexed);
        assert_eq!(error.to_string(), "Unsupported PNG color type: Indexed");
    }

    #[test]
    fn test_image_error_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: ImageError = io_error.into();
        assert!(error.to_string().starts_with("IO error:"));
    }
}
