//! Renderer error types.

use thiserror::Error;

/// Result type for export operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while exporting a plan.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Document assembly or encoding failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// A required font could not be prepared.
    #[error("Font error: {0}")]
    Font(String),
}
