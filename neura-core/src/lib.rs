//! # neuraCanavas Core
//!
//! Sketch logic for the neuraCanavas sketch-to-painting page.
//! Pure and synchronous; compiles to WASM unchanged.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 neura-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Sketch Surface  │  Input Mapping           │
//! │  - RGBA raster   │  - Pointer events        │
//! │  - Pen / eraser  │  - Touch → surface space │
//! ├─────────────────────────────────────────────┤
//! │  Session         │  Export / Wire           │
//! │  - Prompt        │  - PNG + data URIs       │
//! │  - Gen. status   │  - /generate payloads    │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod color;
pub mod error;
pub mod event;
pub mod export;
pub mod raster;
pub mod session;
pub mod surface;
pub mod tool;

pub use api::{GenerateRequest, GenerateResponse, GenerationFailure};
pub use color::Color;
pub use error::{CanvasError, CanvasResult};
pub use event::{
    InputEvent, PointerPhase, StrokeAction, SurfaceOffset, TouchEvent, TouchPhase, TouchPoint,
};
pub use raster::{Point, Raster, MAX_DIMENSION};
pub use session::{GenerationStatus, PendingGeneration, Session};
pub use surface::{InputResponse, SketchSurface, BACKGROUND};
pub use tool::{
    CompositeMode, ToolMode, ToolSettings, DRAW_LINE_WIDTH, ERASE_LINE_WIDTH, INITIAL_LINE_WIDTH,
};

/// Core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
