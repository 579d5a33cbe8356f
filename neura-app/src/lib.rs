//! # neuraCanavas WASM Application
//!
//! Browser host for the sketch page: binds DOM mouse and touch events to the
//! sketch surface, blits the raster onto an `HtmlCanvasElement`, and runs the
//! generate action against the backend.
//!
//! ## Usage
//!
//! Build for WASM (the backend URL is baked in at build time):
//! ```bash
//! NEURA_API_URL=https://paint.example.com wasm-pack build --target web neura-app
//! ```
//!
//! Then import in JavaScript:
//! ```javascript
//! import init, { SketchApp } from './pkg/neura_app.js';
//!
//! await init();
//! const app = new SketchApp('sketch');
//! canvas.addEventListener('mousedown', (e) => app.mouseDown(e));
//! canvas.addEventListener('touchstart', (e) => app.touchStart(e), { passive: false });
//!
//! generateButton.onclick = async () => {
//!     generateButton.disabled = true;
//!     await app.generate();
//!     generateButton.disabled = app.isGenerating();
//!     output.src = app.outputImage() ?? '';
//!     error.textContent = app.errorMessage() ?? '';
//! };
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use neura_client::{shared, ClientConfig, GenerationClient, GenerationFlow, SharedSession};
use neura_core::{
    Color, GenerationStatus, InputEvent, InputResponse, PointerPhase, Session, SurfaceOffset,
    ToolMode, TouchEvent, TouchPhase, TouchPoint,
};
use std::rc::Rc;
use std::sync::MutexGuard;

use wasm_bindgen::prelude::*;
use wasm_bindgen::Clamped;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData, MouseEvent};

/// Backend base URL baked in at build time.
const BUILD_API_URL: Option<&str> = option_env!("NEURA_API_URL");

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    tracing::info!("neuraCanavas WASM initialized");
}

/// The sketch page bound to one canvas element.
#[wasm_bindgen]
pub struct SketchApp {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    session: SharedSession,
    flow: Rc<GenerationFlow<GenerationClient>>,
}

#[wasm_bindgen]
impl SketchApp {
    /// Attach to the canvas element with the given ID.
    ///
    /// The drawing buffer is sized to the element's displayed size.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas element is not found, the 2D context
    /// fails, the displayed size is too large for a raster, or the configured
    /// backend URL is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<SketchApp, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document object"))?;

        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("Canvas element '{canvas_id}' not found")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("Element is not a canvas"))?;

        let ctx = canvas
            .get_context("2d")
            .map_err(|_| JsValue::from_str("Failed to get 2D context"))?
            .ok_or_else(|| JsValue::from_str("2D context not available"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("Failed to cast to 2D context"))?;

        let (width, height) = displayed_size(canvas.offset_width(), canvas.offset_height());
        let session = Session::new(width, height).map_err(|e| JsValue::from_str(&e.to_string()))?;
        canvas.set_width(width);
        canvas.set_height(height);

        let config = ClientConfig::from_value(BUILD_API_URL);
        let client =
            GenerationClient::new(&config).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let app = Self {
            canvas,
            ctx,
            session: shared(session),
            flow: Rc::new(GenerationFlow::new(client)),
        };
        app.render();
        Ok(app)
    }

    /// Blit the raster onto the canvas.
    pub fn render(&self) {
        let session = self.lock();
        let raster = session.surface().raster();
        let rgba = raster.to_rgba();
        match ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(rgba.as_slice()),
            raster.width(),
            raster.height(),
        ) {
            Ok(image_data) => {
                if let Err(err) = self.ctx.put_image_data(&image_data, 0.0, 0.0) {
                    tracing::error!("put_image_data failed: {:?}", err);
                }
            }
            Err(err) => tracing::error!("ImageData creation failed: {:?}", err),
        }
    }

    /// Mouse button pressed on the canvas.
    #[wasm_bindgen(js_name = mouseDown)]
    pub fn mouse_down(&self, event: &MouseEvent) {
        self.pointer(PointerPhase::Down, event);
    }

    /// Mouse moved over the canvas.
    #[wasm_bindgen(js_name = mouseMove)]
    pub fn mouse_move(&self, event: &MouseEvent) {
        self.pointer(PointerPhase::Move, event);
    }

    /// Mouse button released.
    #[wasm_bindgen(js_name = mouseUp)]
    pub fn mouse_up(&self, event: &MouseEvent) {
        self.pointer(PointerPhase::Up, event);
    }

    /// Mouse left the canvas.
    #[wasm_bindgen(js_name = mouseLeave)]
    pub fn mouse_leave(&self, event: &MouseEvent) {
        self.pointer(PointerPhase::Leave, event);
    }

    /// Finger placed on the canvas. Register the listener with `passive: false`.
    #[wasm_bindgen(js_name = touchStart)]
    pub fn touch_start(&self, event: &web_sys::TouchEvent) {
        self.touch(TouchPhase::Start, event);
    }

    /// Finger moved on the canvas.
    #[wasm_bindgen(js_name = touchMove)]
    pub fn touch_move(&self, event: &web_sys::TouchEvent) {
        self.touch(TouchPhase::Move, event);
    }

    /// Finger lifted.
    #[wasm_bindgen(js_name = touchEnd)]
    pub fn touch_end(&self, event: &web_sys::TouchEvent) {
        self.touch(TouchPhase::End, event);
    }

    /// Touch interrupted by the browser.
    #[wasm_bindgen(js_name = touchCancel)]
    pub fn touch_cancel(&self, event: &web_sys::TouchEvent) {
        self.touch(TouchPhase::Cancel, event);
    }

    /// Switch to the pen.
    #[wasm_bindgen(js_name = setDrawMode)]
    pub fn set_draw_mode(&self) {
        self.lock().set_mode(ToolMode::Draw);
    }

    /// Switch to the eraser.
    #[wasm_bindgen(js_name = setEraseMode)]
    pub fn set_erase_mode(&self) {
        self.lock().set_mode(ToolMode::Erase);
    }

    /// Current tool: `"draw"` or `"erase"`.
    #[wasm_bindgen(js_name = toolMode)]
    #[must_use]
    pub fn tool_mode(&self) -> String {
        mode_name(self.lock().surface().tools().mode()).to_string()
    }

    /// Pick the pen color from a color input value (`#rrggbb`).
    ///
    /// # Errors
    ///
    /// Returns an error if the color cannot be parsed.
    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&self, color: &str) -> Result<(), JsValue> {
        let color: Color = color
            .parse()
            .map_err(|e: neura_core::CanvasError| JsValue::from_str(&e.to_string()))?;
        self.lock().set_color(color);
        Ok(())
    }

    /// Clear the sketch and the displayed output image.
    pub fn clear(&self) {
        self.lock().clear();
        self.render();
    }

    /// Update the prompt text.
    #[wasm_bindgen(js_name = setPrompt)]
    pub fn set_prompt(&self, prompt: &str) {
        self.lock().set_prompt(prompt);
    }

    /// Whether a request is outstanding; the generate control should be disabled.
    #[wasm_bindgen(js_name = isGenerating)]
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.lock().is_generating()
    }

    /// The generated image (URL or data URI) to display, if any.
    #[wasm_bindgen(js_name = outputImage)]
    #[must_use]
    pub fn output_image(&self) -> Option<String> {
        self.lock().status().output_image().map(str::to_string)
    }

    /// The error text to display, if any.
    #[wasm_bindgen(js_name = errorMessage)]
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.lock().status().error_message().map(str::to_string)
    }

    /// Current generation status as JSON (`{"state": "...", ...}`).
    #[wasm_bindgen(js_name = statusJson)]
    #[must_use]
    pub fn status_json(&self) -> String {
        status_json(self.lock().status())
    }

    /// Snapshot the sketch and send it for generation.
    ///
    /// Resolves with the final status as JSON, or `null` when nothing was
    /// sent because a request is already outstanding. The sketch stays
    /// editable while the promise is pending.
    #[must_use]
    pub fn generate(&self) -> js_sys::Promise {
        let flow = Rc::clone(&self.flow);
        let session = SharedSession::clone(&self.session);
        wasm_bindgen_futures::future_to_promise(async move {
            Ok(match flow.generate(&session).await {
                Some(status) => JsValue::from_str(&status_json(&status)),
                None => JsValue::NULL,
            })
        })
    }

    /// The sketch as a `data:image/png;base64,...` URI.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    #[wasm_bindgen(js_name = exportDataUri)]
    pub fn export_data_uri(&self) -> Result<String, JsValue> {
        self.lock()
            .surface()
            .export_data_uri()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl SketchApp {
    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn dispatch(&self, event: &InputEvent, offset: SurfaceOffset) -> InputResponse {
        let response = self.lock().surface_mut().handle_input(event, offset);
        if response.pixels_changed > 0 {
            self.render();
        }
        response
    }

    #[allow(clippy::cast_precision_loss)]
    fn pointer(&self, phase: PointerPhase, event: &MouseEvent) {
        let input = InputEvent::pointer(phase, event.offset_x() as f32, event.offset_y() as f32);
        self.dispatch(&input, SurfaceOffset::default());
    }

    #[allow(clippy::cast_possible_truncation)]
    fn touch(&self, phase: TouchPhase, event: &web_sys::TouchEvent) {
        let rect = self.canvas.get_bounding_client_rect();
        let offset = SurfaceOffset::new(rect.left() as f32, rect.top() as f32);
        let input = InputEvent::Touch(TouchEvent::new(phase, touch_points(&event.touches())));

        if self.dispatch(&input, offset).prevent_default {
            event.prevent_default();
        }
    }
}

/// Collect the active touches of a DOM touch list.
#[allow(clippy::cast_precision_loss)]
fn touch_points(list: &web_sys::TouchList) -> Vec<TouchPoint> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| {
            let id = u32::try_from(t.identifier()).unwrap_or_default();
            TouchPoint::new(id, t.client_x() as f32, t.client_y() as f32)
        })
        .collect()
}

/// Drawing buffer size for a displayed element size; collapsed layouts get 1px.
fn displayed_size(offset_width: i32, offset_height: i32) -> (u32, u32) {
    let clamp = |v: i32| u32::try_from(v).unwrap_or(0).max(1);
    (clamp(offset_width), clamp(offset_height))
}

fn mode_name(mode: ToolMode) -> &'static str {
    match mode {
        ToolMode::Draw => "draw",
        ToolMode::Erase => "erase",
    }
}

fn status_json(status: &GenerationStatus) -> String {
    serde_json::to_string(status).unwrap_or_else(|e| {
        tracing::error!("Status serialization failed: {e}");
        String::from(r#"{"state":"idle"}"#)
    })
}
