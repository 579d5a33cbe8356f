//! Input events for the sketch surface.
//!
//! Mouse input already arrives in surface space (`offsetX`/`offsetY`). Touch
//! input arrives in viewport space and is mapped by subtracting the surface's
//! on-screen origin, using the primary touch only.

use serde::{Deserialize, Serialize};

use crate::Point;

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled (e.g., palm rejection).
    Cancel,
}

/// Phase of a mouse/pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
    /// Pointer left the surface.
    Leave,
}

/// On-screen origin of the surface (its bounding client rect's left/top).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceOffset {
    /// Distance from the viewport's left edge.
    pub left: f32,
    /// Distance from the viewport's top edge.
    pub top: f32,
}

impl SurfaceOffset {
    /// Create an offset.
    #[must_use]
    pub const fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }

    /// Map a viewport (client) position into surface space.
    #[must_use]
    pub fn to_surface(self, client_x: f32, client_y: f32) -> Point {
        Point::new(client_x - self.left, client_y - self.top)
    }
}

/// A single touch point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// X position relative to the viewport.
    pub client_x: f32,
    /// Y position relative to the viewport.
    pub client_y: f32,
}

impl TouchPoint {
    /// Create a touch point.
    #[must_use]
    pub const fn new(id: u32, client_x: f32, client_y: f32) -> Self {
        Self {
            id,
            client_x,
            client_y,
        }
    }
}

/// A touch event with one or more touch points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points.
    #[serde(default)]
    pub touches: Vec<TouchPoint>,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>) -> Self {
        Self { phase, touches }
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Check if this is a multi-touch event.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }
}

/// All input events the sketch surface can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum InputEvent {
    /// Raw touch event.
    Touch(TouchEvent),

    /// Mouse event in surface coordinates.
    Pointer {
        /// Event phase.
        phase: PointerPhase,
        /// X coordinate relative to the surface.
        x: f32,
        /// Y coordinate relative to the surface.
        y: f32,
    },
}

/// What an input event asks of the current stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeAction {
    /// Anchor a new stroke here.
    Begin(Point),
    /// Continue the current stroke to here.
    Extend(Point),
    /// Finish the current stroke.
    End,
    /// Nothing to do (e.g. a touch start without touches).
    Ignore,
}

impl InputEvent {
    /// Shorthand for a pointer event.
    #[must_use]
    pub const fn pointer(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self::Pointer { phase, x, y }
    }

    /// Shorthand for a single-finger touch event.
    #[must_use]
    pub fn single_touch(phase: TouchPhase, client_x: f32, client_y: f32) -> Self {
        Self::Touch(TouchEvent::new(
            phase,
            vec![TouchPoint::new(0, client_x, client_y)],
        ))
    }

    /// Position of this event in surface space, if it carries one.
    #[must_use]
    pub fn surface_point(&self, offset: SurfaceOffset) -> Option<Point> {
        match self {
            Self::Pointer { x, y, .. } => Some(Point::new(*x, *y)),
            Self::Touch(touch) => touch
                .primary_touch()
                .map(|t| offset.to_surface(t.client_x, t.client_y)),
        }
    }

    /// Translate the event into a stroke action.
    #[must_use]
    pub fn stroke_action(&self, offset: SurfaceOffset) -> StrokeAction {
        let point = self.surface_point(offset);
        let (begin, extend) = match self {
            Self::Pointer { phase, .. } => match phase {
                PointerPhase::Down => (true, false),
                PointerPhase::Move => (false, true),
                PointerPhase::Up | PointerPhase::Leave => return StrokeAction::End,
            },
            Self::Touch(touch) => match touch.phase {
                TouchPhase::Start => (true, false),
                TouchPhase::Move => (false, true),
                TouchPhase::End | TouchPhase::Cancel => return StrokeAction::End,
            },
        };
        match point {
            Some(p) if begin => StrokeAction::Begin(p),
            Some(p) if extend => StrokeAction::Extend(p),
            _ => StrokeAction::Ignore,
        }
    }

    /// Whether this is a touch event.
    #[must_use]
    pub fn is_touch(&self) -> bool {
        matches!(self, Self::Touch(_))
    }
}
