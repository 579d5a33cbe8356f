//! Session state: the surface, the prompt, and the generation status.

use serde::{Deserialize, Serialize};

use crate::api::{GenerateRequest, GenerationFailure};
use crate::error::CanvasResult;
use crate::{Color, SketchSurface, ToolMode};

/// Where the last (or current) generation attempt stands.
///
/// One tagged value, so "in progress", "showing an image" and "showing an
/// error" can never hold at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GenerationStatus {
    /// Nothing requested yet, or the output was cleared.
    #[default]
    Idle,
    /// A request is outstanding.
    InProgress,
    /// The backend returned an image.
    Completed {
        /// URL or data URI of the generated image.
        image: String,
    },
    /// The attempt failed.
    Failed {
        /// Message for the error display.
        message: String,
    },
}

impl GenerationStatus {
    /// Whether a request is outstanding.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// The displayed output image, if any.
    #[must_use]
    pub fn output_image(&self) -> Option<&str> {
        match self {
            Self::Completed { image } => Some(image),
            _ => None,
        }
    }

    /// The displayed error, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// A generation the session has committed to; hand it to a backend and
/// report back with [`Session::finish_generation`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending generation leaves the session in progress until finished"]
pub struct PendingGeneration {
    request: GenerateRequest,
}

impl PendingGeneration {
    /// The request body to send.
    #[must_use]
    pub fn request(&self) -> &GenerateRequest {
        &self.request
    }

    /// Take the request body.
    #[must_use]
    pub fn into_request(self) -> GenerateRequest {
        self.request
    }
}

/// Everything one sketching page holds.
#[derive(Debug, Clone)]
pub struct Session {
    surface: SketchSurface,
    prompt: String,
    status: GenerationStatus,
}

impl Session {
    /// Start a session with a fresh surface of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidSize`](crate::CanvasError::InvalidSize)
    /// if the size is too large for a raster.
    pub fn new(width: u32, height: u32) -> CanvasResult<Self> {
        Ok(Self::with_surface(SketchSurface::new(width, height)?))
    }

    /// Start a session around an existing surface.
    #[must_use]
    pub fn with_surface(surface: SketchSurface) -> Self {
        Self {
            surface,
            prompt: String::new(),
            status: GenerationStatus::Idle,
        }
    }

    /// The drawing surface.
    #[must_use]
    pub fn surface(&self) -> &SketchSurface {
        &self.surface
    }

    /// Mutable access for input handlers. Usable while a request is outstanding.
    pub fn surface_mut(&mut self) -> &mut SketchSurface {
        &mut self.surface
    }

    /// The prompt as typed by the user.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Replace the prompt text.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Current generation status.
    #[must_use]
    pub fn status(&self) -> &GenerationStatus {
        &self.status
    }

    /// Whether a request is outstanding (the generate control should be disabled).
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.status.is_in_progress()
    }

    /// Switch tool.
    pub fn set_mode(&mut self, mode: ToolMode) {
        self.surface.set_mode(mode);
    }

    /// Pick the pen color.
    pub fn set_color(&mut self, color: Color) {
        self.surface.set_color(color);
    }

    /// Clear the sketch and drop a displayed output image.
    ///
    /// An outstanding request keeps running and a displayed error stays.
    pub fn clear(&mut self) {
        self.surface.clear();
        if matches!(self.status, GenerationStatus::Completed { .. }) {
            self.status = GenerationStatus::Idle;
        }
    }

    /// Snapshot the sketch and mark the session in progress.
    ///
    /// Returns `None` without side effects while a request is outstanding.
    /// If the sketch cannot be encoded the session records the failure and
    /// returns `None`, so nothing is sent.
    pub fn begin_generation(&mut self) -> Option<PendingGeneration> {
        if self.is_generating() {
            tracing::debug!("Generation already in progress, ignoring request");
            return None;
        }

        let image_data = match self.surface.export_data_uri() {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!("Could not snapshot sketch: {e}");
                self.status = GenerationStatus::Failed {
                    message: GenerationFailure::Encode.user_message(),
                };
                return None;
            }
        };

        self.status = GenerationStatus::InProgress;
        let request = GenerateRequest::new(image_data, &self.prompt);
        tracing::info!(
            "Generation started ({} bytes of image data, prompt {:?})",
            request.image_data.len(),
            request.prompt
        );
        Some(PendingGeneration { request })
    }

    /// Record the outcome of a request started with [`Self::begin_generation`].
    pub fn finish_generation(&mut self, result: Result<String, GenerationFailure>) {
        if !self.is_generating() {
            tracing::warn!("Generation finished while not in progress");
        }
        self.status = match result {
            Ok(image) => {
                tracing::info!("Generation completed");
                GenerationStatus::Completed { image }
            }
            Err(failure) => {
                let message = failure.user_message();
                tracing::warn!("Generation failed: {message}");
                GenerationStatus::Failed { message }
            }
        };
    }
}
