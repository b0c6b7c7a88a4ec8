//! Error types for annotation file operations.

use thiserror::Error;

/// Errors that can occur while reading or writing annotation files.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A shape was offered for saving that is not a four-point quad
    #[error("Shape is not a quad: has {points} points")]
    NotAQuad {
        /// Number of points the shape actually had
        points: usize,
    },

    /// Required field is missing
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// Embedded image data could not be decoded
    #[error("Invalid embedded image data: {0}")]
    ImageData(#[from] base64::DecodeError),
}

impl FormatError {
    /// Create a missing-field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}
