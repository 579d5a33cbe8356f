//! CLI error types.

use std::path::PathBuf;

use neura_client::ClientError;
use neura_core::CanvasError;
use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors from script replay and output handling.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading or writing a file failed.
    #[error("{path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The sketch script is not valid JSON for the step format.
    #[error("invalid sketch script: {0}")]
    Script(#[from] serde_json::Error),

    /// Encoding or decoding image data failed.
    #[error(transparent)]
    Canvas(#[from] CanvasError),

    /// Talking to the backend failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The generated image reference is neither a data URI nor an http(s) URL.
    #[error("unsupported generated image reference: {0}")]
    UnsupportedImage(String),
}

impl CliError {
    /// Wrap an I/O error with the path it concerns.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
