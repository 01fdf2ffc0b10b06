//! Error types for charney.
//!
//! A single error enum covers input, parameter and rendering failures. Numerical
//! degeneracies (all-missing fields, zero-width ranges) are not errors.

use thiserror::Error;

/// The main error type for charney operations.
#[derive(Error, Debug)]
pub enum CharneyError {
    /// NetCDF file operation errors
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid coordinate errors
    #[error("Invalid coordinates: {message}")]
    InvalidCoordinates { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Data not found errors
    #[error("Data not found: {message}")]
    DataNotFound { message: String },

    /// Interpolation errors
    #[error("Interpolation error: {message}")]
    Interpolation { message: String },

    /// Array shape errors
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CharneyError {
    /// Shorthand for an [`CharneyError::InvalidParameter`] error.
    pub fn invalid_parameter(param: &str, message: impl Into<String>) -> Self {
        CharneyError::InvalidParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }
}

impl From<image::ImageError> for CharneyError {
    fn from(err: image::ImageError) -> Self {
        CharneyError::ImageGeneration {
            message: err.to_string(),
        }
    }
}

/// Convenience type alias for Results with CharneyError
pub type Result<T> = std::result::Result<T, CharneyError>;
