//! Sketch Surface Integration Tests
//!
//! Exercises the surface through its public API:
//! - Stroke lifecycle invariants (extend outside a stroke never paints)
//! - Touch and pointer input landing on the same pixels
//! - Clear/mode interplay
//! - Export of what was drawn

use neura_core::export::{decode_data_uri, decode_image, PNG_MIME};
use neura_core::{
    Color, CompositeMode, InputEvent, PointerPhase, Session, SketchSurface, SurfaceOffset,
    ToolMode, TouchEvent, TouchPhase, DRAW_LINE_WIDTH,
};
use proptest::prelude::*;

const SIZE: u32 = 64;

#[derive(Debug, Clone)]
enum Op {
    Begin(f32, f32),
    Extend(f32, f32),
    End,
    Mode(ToolMode),
}

fn arb_coord() -> impl Strategy<Value = f32> {
    -16.0f32..80.0f32
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (arb_coord(), arb_coord()).prop_map(|(x, y)| Op::Begin(x, y)),
        (arb_coord(), arb_coord()).prop_map(|(x, y)| Op::Extend(x, y)),
        Just(Op::End),
        prop_oneof![Just(ToolMode::Draw), Just(ToolMode::Erase)].prop_map(Op::Mode),
    ]
}

/// A stroke drawn through pointer events at surface coordinates.
fn pointer_stroke(points: &[(u16, u16)]) -> Vec<InputEvent> {
    let mut events = Vec::new();
    for (i, &(x, y)) in points.iter().enumerate() {
        let phase = if i == 0 {
            PointerPhase::Down
        } else {
            PointerPhase::Move
        };
        events.push(InputEvent::pointer(phase, f32::from(x), f32::from(y)));
    }
    events.push(InputEvent::pointer(PointerPhase::Up, 0.0, 0.0));
    events
}

/// The same stroke as touch events at viewport coordinates.
fn touch_stroke(points: &[(u16, u16)], offset: SurfaceOffset) -> Vec<InputEvent> {
    let mut events = Vec::new();
    for (i, &(x, y)) in points.iter().enumerate() {
        let phase = if i == 0 {
            TouchPhase::Start
        } else {
            TouchPhase::Move
        };
        events.push(InputEvent::single_touch(
            phase,
            f32::from(x) + offset.left,
            f32::from(y) + offset.top,
        ));
    }
    events.push(InputEvent::Touch(TouchEvent::new(TouchPhase::End, vec![])));
    events
}

fn replay(events: &[InputEvent], offset: SurfaceOffset) -> SketchSurface {
    let mut surface = SketchSurface::new(SIZE, SIZE).expect("surface");
    for event in events {
        surface.handle_input(event, offset);
    }
    surface
}

// ============================================================================
// Stroke lifecycle
// ============================================================================

proptest! {
    #[test]
    fn prop_extend_outside_stroke_never_paints(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut surface = SketchSurface::new(SIZE, SIZE).expect("surface");
        let mut drawing = false;

        for op in ops {
            match op {
                Op::Begin(x, y) => {
                    surface.begin_stroke(x, y);
                    drawing = true;
                }
                Op::Extend(x, y) => {
                    let before = surface.raster().clone();
                    let changed = surface.extend_stroke(x, y);
                    if !drawing {
                        prop_assert_eq!(changed, 0);
                        prop_assert_eq!(surface.raster(), &before);
                    }
                }
                Op::End => {
                    surface.end_stroke();
                    drawing = false;
                }
                Op::Mode(mode) => surface.set_mode(mode),
            }
            prop_assert_eq!(surface.is_drawing(), drawing);
        }
    }

    #[test]
    fn prop_clear_always_restores_background(
        ops in prop::collection::vec(arb_op(), 0..40),
        color in any::<(u8, u8, u8)>(),
    ) {
        let mut surface = SketchSurface::new(SIZE, SIZE).expect("surface");
        surface.set_color(Color::rgb(color.0, color.1, color.2));
        for op in ops {
            match op {
                Op::Begin(x, y) => surface.begin_stroke(x, y),
                Op::Extend(x, y) => {
                    surface.extend_stroke(x, y);
                }
                Op::End => surface.end_stroke(),
                Op::Mode(mode) => surface.set_mode(mode),
            }
        }

        surface.clear();

        prop_assert!(surface.raster().is_uniform(Color::WHITE));
        prop_assert_eq!(surface.tools().mode(), ToolMode::Draw);
        prop_assert_eq!(surface.tools().composite(), CompositeMode::SourceOver);
    }

    #[test]
    fn prop_touch_and_pointer_paint_identically(
        points in prop::collection::vec((0u16..64, 0u16..64), 1..12),
        left in 0u16..500,
        top in 0u16..500,
    ) {
        let offset = SurfaceOffset::new(f32::from(left), f32::from(top));
        let by_pointer = replay(&pointer_stroke(&points), offset);
        let by_touch = replay(&touch_stroke(&points, offset), offset);
        prop_assert_eq!(by_pointer.raster(), by_touch.raster());
    }

    #[test]
    fn prop_touch_maps_to_pointer_point(
        x in 0.0f32..2000.0,
        y in 0.0f32..2000.0,
        left in -500.0f32..500.0,
        top in -500.0f32..500.0,
    ) {
        let offset = SurfaceOffset::new(left, top);
        let touch = InputEvent::single_touch(TouchPhase::Start, x + left, y + top);
        let pointer = InputEvent::pointer(PointerPhase::Down, x, y);

        let a = touch.surface_point(offset).expect("touch point");
        let b = pointer.surface_point(offset).expect("pointer point");
        prop_assert!((a.x - b.x).abs() < 1e-3, "x: {} vs {}", a.x, b.x);
        prop_assert!((a.y - b.y).abs() < 1e-3, "y: {} vs {}", a.y, b.y);
    }
}

// ============================================================================
// Tool interplay
// ============================================================================

#[test]
fn test_erasing_then_drawing_uses_remembered_color() {
    let mut surface = SketchSurface::new(SIZE, SIZE).expect("surface");
    let green = Color::rgb(0, 160, 0);
    surface.set_color(green);
    surface.set_mode(ToolMode::Erase);
    surface.set_mode(ToolMode::Draw);
    assert!((surface.tools().line_width() - DRAW_LINE_WIDTH).abs() < f32::EPSILON);

    surface.begin_stroke(10.0, 32.5);
    surface.extend_stroke(50.0, 32.5);
    surface.end_stroke();

    assert_eq!(surface.raster().pixel(30, 32), Some(green));
    // the 3px pen does not reach 3 rows away
    assert_eq!(surface.raster().pixel(30, 35), Some(Color::WHITE));
}

#[test]
fn test_erase_stroke_punches_through_drawing() {
    let mut surface = SketchSurface::new(SIZE, SIZE).expect("surface");
    for y in (0..SIZE).step_by(2) {
        #[allow(clippy::cast_precision_loss)]
        let y = y as f32 + 0.5;
        surface.begin_stroke(0.0, y);
        surface.extend_stroke(SIZE as f32, y);
        surface.end_stroke();
    }
    surface.set_mode(ToolMode::Erase);
    surface.begin_stroke(32.0, 32.0);
    surface.extend_stroke(32.0, 32.0);
    surface.end_stroke();

    assert_eq!(surface.raster().pixel(32, 32), Some(Color::TRANSPARENT));
    assert_eq!(surface.raster().pixel(2, 2), Some(Color::BLACK));
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn test_generation_snapshot_decodes_to_drawn_raster() {
    let mut session = Session::new(SIZE, SIZE).expect("session");
    session.set_color(Color::rgb(255, 0, 0));
    session.surface_mut().begin_stroke(4.0, 4.0);
    session.surface_mut().extend_stroke(60.0, 60.0);
    session.surface_mut().end_stroke();

    let pending = session.begin_generation().expect("begin");
    let uri = decode_data_uri(&pending.request().image_data).expect("data uri");
    assert_eq!(uri.mime, PNG_MIME);

    let decoded = decode_image(&uri.bytes).expect("png");
    assert_eq!(&decoded, session.surface().raster());
}
