//! Error types for the editing core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in the editing core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Grid dimension is not one of the supported sizes.
    #[error("Unsupported grid size: {0}")]
    UnsupportedGridSize(usize),

    /// Cell data does not match the declared grid dimension.
    #[error("Grid data has {actual} cells, expected {expected} for size {size}")]
    GridShape {
        /// Declared grid dimension (cells per side).
        size: usize,
        /// Expected cell count (`size * size`).
        expected: usize,
        /// Actual cell count found.
        actual: usize,
    },

    /// Brush size is outside the supported range.
    #[error("Unsupported brush size: {0}")]
    UnsupportedBrushSize(usize),

    /// The requested question does not exist in the session.
    #[error("Question not found: {0}")]
    QuestionNotFound(String),

    /// A stored activity document failed validation.
    #[error("Invalid activity document: {0}")]
    InvalidDocument(String),

    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
