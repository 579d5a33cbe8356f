//! JSON sketch scripts.
//!
//! A script is an array of steps replayed in order onto a session:
//!
//! ```json
//! [
//!   {"step": "color", "color": "#ff0000"},
//!   {"step": "stroke", "points": [[10, 10], [120, 80], [200, 40]]},
//!   {"step": "mode", "mode": "erase"},
//!   {"step": "stroke", "points": [[100, 0], [100, 200]]},
//!   {"step": "input", "event": {"type": "pointer", "data": {"phase": "down", "x": 5, "y": 5}}}
//! ]
//! ```

use std::path::Path;

use neura_core::{Color, InputEvent, Session, SurfaceOffset, ToolMode};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "lowercase")]
pub enum ScriptStep {
    /// Switch between pen and eraser.
    Mode {
        /// Tool to select.
        mode: ToolMode,
    },
    /// Pick the pen color.
    Color {
        /// Color such as `#ff0000`.
        color: Color,
    },
    /// A complete stroke: begin at the first point, extend through the rest, end.
    Stroke {
        /// Surface coordinates.
        points: Vec<[f32; 2]>,
    },
    /// Clear the sketch.
    Clear,
    /// Feed a raw pointer or touch event.
    Input {
        /// The event.
        event: InputEvent,
        /// Surface origin used to map touch coordinates.
        #[serde(default)]
        offset: SurfaceOffset,
    },
}

impl ScriptStep {
    /// Apply this step to the session. Returns the number of pixels changed.
    pub fn apply(&self, session: &mut Session) -> usize {
        match self {
            Self::Mode { mode } => {
                session.set_mode(*mode);
                0
            }
            Self::Color { color } => {
                session.set_color(*color);
                0
            }
            Self::Stroke { points } => {
                let Some(([x, y], rest)) = points.split_first() else {
                    return 0;
                };
                let surface = session.surface_mut();
                surface.begin_stroke(*x, *y);
                let changed: usize = rest
                    .iter()
                    .map(|[x, y]| surface.extend_stroke(*x, *y))
                    .sum();
                surface.end_stroke();
                changed
            }
            Self::Clear => {
                session.clear();
                0
            }
            Self::Input { event, offset } => {
                session
                    .surface_mut()
                    .handle_input(event, *offset)
                    .pixels_changed
            }
        }
    }
}

/// Parse a script from JSON text.
///
/// # Errors
///
/// Returns [`CliError::Script`] if the text is not a valid step array.
pub fn parse_script(json: &str) -> CliResult<Vec<ScriptStep>> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a script file.
///
/// # Errors
///
/// Returns [`CliError::Io`] if the file cannot be read and
/// [`CliError::Script`] if it does not parse.
pub fn load_script(path: &Path) -> CliResult<Vec<ScriptStep>> {
    let json = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    parse_script(&json)
}

/// Replay steps in order. Returns the total number of pixel changes.
pub fn replay(steps: &[ScriptStep], session: &mut Session) -> usize {
    let changed: usize = steps.iter().map(|step| step.apply(session)).sum();
    tracing::debug!("Replayed {} script steps ({changed} pixel changes)", steps.len());
    changed
}
