//! Wire types for the image generation backend.
//!
//! `POST <base>/generate` with [`GenerateRequest`]; the backend answers with a
//! [`GenerateResponse`] carrying either `generated_image` or `error`.

use serde::{Deserialize, Serialize};

/// Prompt sent when the user leaves the prompt field empty.
pub const DEFAULT_PROMPT: &str = "Paint this sketch beautifully.";
/// Shown when the backend answers without an image or an error text.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";
/// Shown when the backend cannot be reached at all.
pub const UNREACHABLE_MESSAGE: &str = "Failed to reach the backend.";
/// Shown when the sketch could not be encoded for upload.
pub const ENCODE_ERROR_MESSAGE: &str = "Failed to encode the sketch.";

/// Body of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The sketch as a `data:image/png;base64,...` URI.
    pub image_data: String,
    /// Prompt forwarded to the model.
    pub prompt: String,
}

impl GenerateRequest {
    /// Build a request, substituting [`DEFAULT_PROMPT`] for an empty prompt.
    #[must_use]
    pub fn new(image_data: String, prompt: &str) -> Self {
        Self {
            image_data,
            prompt: effective_prompt(prompt).to_string(),
        }
    }
}

/// The prompt actually sent for a user-entered prompt.
///
/// Only an empty prompt is replaced; whitespace goes out as typed.
#[must_use]
pub fn effective_prompt(prompt: &str) -> &str {
    if prompt.is_empty() {
        DEFAULT_PROMPT
    } else {
        prompt
    }
}

/// Body of a generation response. Both fields are optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// URL or data URI of the generated image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image: Option<String>,
    /// Server-supplied error text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    /// Interpret the body given whether the HTTP status was a success.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationFailure::Server`] unless the status succeeded and a
    /// non-empty `generated_image` is present.
    pub fn into_result(self, status_ok: bool) -> Result<String, GenerationFailure> {
        match self.generated_image {
            Some(image) if status_ok && !image.is_empty() => Ok(image),
            _ => Err(GenerationFailure::Server {
                message: self.error.filter(|e| !e.is_empty()),
            }),
        }
    }
}

/// Why a generation attempt produced no image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    /// The backend answered, but not with an image.
    Server {
        /// Error text from the response body, if any.
        message: Option<String>,
    },
    /// The backend could not be reached (connect, DNS, timeout, broken body).
    Unreachable,
    /// The sketch could not be encoded, so nothing was sent.
    Encode,
}

impl GenerationFailure {
    /// Message shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message: Some(m) } => m.clone(),
            Self::Server { message: None } => SERVER_ERROR_MESSAGE.to_string(),
            Self::Unreachable => UNREACHABLE_MESSAGE.to_string(),
            Self::Encode => ENCODE_ERROR_MESSAGE.to_string(),
        }
    }
}
