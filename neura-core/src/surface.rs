//! The sketch surface: a raster plus the tool and stroke state that paint it.

use crate::error::CanvasResult;
use crate::event::{InputEvent, StrokeAction, SurfaceOffset, TouchPhase};
use crate::export;
use crate::{Color, Point, Raster, ToolMode, ToolSettings};

/// Background every new or cleared surface is filled with.
pub const BACKGROUND: Color = Color::WHITE;

/// How the host should treat the DOM event after the surface handled it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputResponse {
    /// Suppress the browser's default handling (scroll, zoom) for this event.
    pub prevent_default: bool,
    /// Number of pixels the event changed.
    pub pixels_changed: usize,
}

/// Freehand drawing surface backed by an owned raster.
#[derive(Debug, Clone)]
pub struct SketchSurface {
    raster: Raster,
    tools: ToolSettings,
    background: Color,
    /// Last recorded point of the active stroke; `None` when not drawing.
    last_point: Option<Point>,
}

impl SketchSurface {
    /// Allocate a white surface of the displayed size with a thin black pen.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidSize`](crate::CanvasError::InvalidSize)
    /// if the size is too large for a raster.
    pub fn new(width: u32, height: u32) -> CanvasResult<Self> {
        Self::with_background(width, height, BACKGROUND)
    }

    /// Allocate a surface filled with a custom background.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidSize`](crate::CanvasError::InvalidSize)
    /// if the size is too large for a raster.
    pub fn with_background(width: u32, height: u32, background: Color) -> CanvasResult<Self> {
        if width == 0 || height == 0 {
            tracing::warn!("Sketch surface requested at {width}x{height}, clamping to 1px");
        }
        let raster = Raster::new(width, height, background)
            .inspect_err(|e| tracing::error!("Sketch surface allocation failed: {e}"))?;
        tracing::debug!(
            "Sketch surface initialized at {}x{}",
            raster.width(),
            raster.height()
        );
        Ok(Self {
            raster,
            tools: ToolSettings::new(),
            background,
            last_point: None,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// The pixel buffer.
    #[must_use]
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// The active tool settings.
    #[must_use]
    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    /// The fill color used by `new` and `clear`.
    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.last_point.is_some()
    }

    /// Anchor a new stroke. Paints nothing until the stroke is extended.
    pub fn begin_stroke(&mut self, x: f32, y: f32) {
        self.last_point = Some(Point::new(x, y));
    }

    /// Draw from the last point to `(x, y)` with the current tool.
    ///
    /// No-op when no stroke is active. Returns the number of pixels changed.
    pub fn extend_stroke(&mut self, x: f32, y: f32) -> usize {
        let Some(from) = self.last_point else {
            return 0;
        };
        let to = Point::new(x, y);
        let changed = self.raster.stroke_segment(
            from,
            to,
            self.tools.line_width(),
            self.tools.color(),
            self.tools.composite(),
        );
        self.last_point = Some(to);
        changed
    }

    /// Finish the active stroke.
    pub fn end_stroke(&mut self) {
        self.last_point = None;
    }

    /// Switch between pen and eraser. Already painted pixels are untouched.
    pub fn set_mode(&mut self, mode: ToolMode) {
        self.tools.set_mode(mode);
        tracing::debug!(
            "Tool mode {:?}: width {} composite {:?}",
            mode,
            self.tools.line_width(),
            self.tools.composite()
        );
    }

    /// Pick the pen color for subsequent draw-mode strokes.
    pub fn set_color(&mut self, color: Color) {
        self.tools.set_color(color);
    }

    /// Refill the raster with the background and go back to the pen.
    pub fn clear(&mut self) {
        self.raster.fill(self.background);
        self.end_stroke();
        self.set_mode(ToolMode::Draw);
        tracing::debug!("Sketch surface cleared");
    }

    /// Route a pointer or touch event to the stroke operations.
    ///
    /// `offset` is the surface's on-screen origin and is only used for touch
    /// events. Touch gestures on the surface suppress the browser default:
    /// always on touch start, and on touch move while a stroke is active.
    pub fn handle_input(&mut self, event: &InputEvent, offset: SurfaceOffset) -> InputResponse {
        let prevent_default = match event {
            InputEvent::Touch(touch) => match touch.phase {
                TouchPhase::Start => true,
                TouchPhase::Move => self.is_drawing(),
                TouchPhase::End | TouchPhase::Cancel => false,
            },
            InputEvent::Pointer { .. } => false,
        };

        let pixels_changed = match event.stroke_action(offset) {
            StrokeAction::Begin(p) => {
                self.begin_stroke(p.x, p.y);
                0
            }
            StrokeAction::Extend(p) => self.extend_stroke(p.x, p.y),
            StrokeAction::End => {
                self.end_stroke();
                0
            }
            StrokeAction::Ignore => 0,
        };

        InputResponse {
            prevent_default,
            pixels_changed,
        }
    }

    /// Lossless PNG snapshot of the raster.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn export_png(&self) -> CanvasResult<Vec<u8>> {
        export::encode_png(&self.raster)
    }

    /// PNG snapshot as a `data:image/png;base64,...` URI, ready for the wire.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn export_data_uri(&self) -> CanvasResult<String> {
        export::encode_png_data_uri(&self.raster)
    }
}
