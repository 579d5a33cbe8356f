//! Error types for sketch operations.

use thiserror::Error;

/// Result type for sketch operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in sketch operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// A color string could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Raster encoding (PNG) failed.
    #[error("Failed to encode raster: {0}")]
    Encode(String),

    /// A data URI could not be decoded.
    #[error("Invalid data URI: {0}")]
    DataUri(String),

    /// A raster cannot be allocated at the requested size.
    #[error("Invalid raster size: {width}x{height}")]
    InvalidSize {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}
