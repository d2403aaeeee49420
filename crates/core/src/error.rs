//! Error types for Greencover

use thiserror::Error;

/// Main error type for Greencover operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Two grids (or a grid and a polygon) do not share the same georeference.
    #[error("Mismatched georeference ({property}): {left} vs {right}")]
    MismatchedGeoreference {
        property: &'static str,
        left: String,
        right: String,
    },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn mismatch(
        property: &'static str,
        left: impl std::fmt::Display,
        right: impl std::fmt::Display,
    ) -> Self {
        Error::MismatchedGeoreference {
            property,
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}

/// Result type alias for Greencover operations
pub type Result<T> = std::result::Result<T, Error>;
