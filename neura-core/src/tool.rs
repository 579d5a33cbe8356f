//! Tool settings: what the next stroke will look like.

use serde::{Deserialize, Serialize};

use crate::Color;

/// Line width right after the surface is initialized.
pub const INITIAL_LINE_WIDTH: f32 = 2.0;
/// Line width of the pen once draw mode is (re)selected.
pub const DRAW_LINE_WIDTH: f32 = 3.0;
/// Line width of the eraser.
pub const ERASE_LINE_WIDTH: f32 = 15.0;

/// Which tool the user is holding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// Paint with the selected color.
    #[default]
    Draw,
    /// Remove pixels.
    Erase,
}

/// How new stroke pixels combine with what is already on the raster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeMode {
    /// Paint over existing pixels.
    #[default]
    SourceOver,
    /// Knock existing pixels out to transparent.
    DestinationOut,
}

/// The active stroke style.
///
/// Mode, width and compositing always move together; the color is kept
/// independently so that erasing never loses the user's pick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToolSettings {
    mode: ToolMode,
    color: Color,
    line_width: f32,
    composite: CompositeMode,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolSettings {
    /// Settings of a freshly initialized surface: thin black pen.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: ToolMode::Draw,
            color: Color::BLACK,
            line_width: INITIAL_LINE_WIDTH,
            composite: CompositeMode::SourceOver,
        }
    }

    /// Switch tool. Drawing restores the narrow pen, erasing forces the wide eraser.
    pub fn set_mode(&mut self, mode: ToolMode) {
        self.mode = mode;
        match mode {
            ToolMode::Draw => {
                self.line_width = DRAW_LINE_WIDTH;
                self.composite = CompositeMode::SourceOver;
            }
            ToolMode::Erase => {
                self.line_width = ERASE_LINE_WIDTH;
                self.composite = CompositeMode::DestinationOut;
            }
        }
    }

    /// Pick the pen color. Takes effect for the next draw-mode stroke.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Current tool.
    #[must_use]
    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Selected pen color (retained while erasing).
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Current stroke width in pixels.
    #[must_use]
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Current compositing rule.
    #[must_use]
    pub fn composite(&self) -> CompositeMode {
        self.composite
    }
}
