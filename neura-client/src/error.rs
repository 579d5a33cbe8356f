//! Client error types.

use neura_core::GenerationFailure;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur when talking to the generation backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL is invalid.
    #[error("invalid generation backend URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed (connection, timeout, body read, etc.).
    #[error("generation backend HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The backend answered without an image.
    #[error("generation backend rejected the request (HTTP {status}): {}", .failure.user_message())]
    Rejected {
        /// HTTP status code of the response.
        status: u16,
        /// Interpreted failure.
        failure: GenerationFailure,
    },
    /// A downloaded result was refused.
    #[error("download failed with HTTP {0}")]
    Download(u16),
}

impl ClientError {
    /// How this error is reported to the user.
    ///
    /// Anything that kept a response from arriving counts as unreachable.
    #[must_use]
    pub fn failure(&self) -> GenerationFailure {
        match self {
            Self::Rejected { failure, .. } => failure.clone(),
            Self::InvalidUrl(_) | Self::Http(_) | Self::Download(_) => {
                GenerationFailure::Unreachable
            }
        }
    }
}
