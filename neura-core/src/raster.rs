//! Fixed-size pixel buffer and the round-capped stroke rasterizer.
//!
//! Pixels live in a [`tiny_skia::Pixmap`] (premultiplied RGBA8). Everything
//! that leaves this module, from [`Raster::pixel`] to [`Raster::to_rgba`], is
//! straight RGBA, which is what `ImageData` and the PNG encoder expect.

use serde::{Deserialize, Serialize};
use tiny_skia::{
    BlendMode, ColorU8, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap,
    PremultipliedColorU8, Stroke, Transform,
};

use crate::error::{CanvasError, CanvasResult};
use crate::{Color, CompositeMode};

/// Largest accepted width or height, in pixels.
pub const MAX_DIMENSION: u32 = 16_384;

/// Extra pixels around a stroke's geometric bounds touched by anti-aliasing.
const AA_MARGIN: f32 = 1.0;

/// A point in surface pixel space (origin top-left, y down).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Squared distance to another point.
    #[must_use]
    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }
}

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy)]
struct Region {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

/// Anti-aliased RGBA pixel grid.
#[derive(Debug, Clone)]
pub struct Raster {
    pixmap: Pixmap,
}

impl PartialEq for Raster {
    fn eq(&self, other: &Self) -> bool {
        self.pixmap.width() == other.pixmap.width()
            && self.pixmap.height() == other.pixmap.height()
            && self.pixmap.data() == other.pixmap.data()
    }
}

impl Eq for Raster {}

impl Raster {
    /// Allocate a raster filled with `fill`. Zero dimensions are raised to 1.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidSize`] if either dimension exceeds
    /// [`MAX_DIMENSION`] or the buffer cannot be allocated.
    pub fn new(width: u32, height: u32, fill: Color) -> CanvasResult<Self> {
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(CanvasError::InvalidSize { width, height });
        }
        let pixmap = Pixmap::new(width.max(1), height.max(1))
            .ok_or(CanvasError::InvalidSize { width, height })?;
        let mut raster = Self { pixmap };
        raster.fill(fill);
        Ok(raster)
    }

    /// Build a raster from row-major straight RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidSize`] if the size is out of range or
    /// `data` does not hold exactly `width * height` pixels.
    pub fn from_rgba(width: u32, height: u32, data: &[u8]) -> CanvasResult<Self> {
        let mut raster = Self::new(width, height, Color::TRANSPARENT)?;
        if width == 0 || height == 0 || data.len() != raster.pixmap.data().len() {
            return Err(CanvasError::InvalidSize { width, height });
        }
        for (px, chunk) in raster
            .pixmap
            .pixels_mut()
            .iter_mut()
            .zip(data.chunks_exact(4))
        {
            *px = premultiply(Color::from_array([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }
        Ok(raster)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight (non-premultiplied) RGBA bytes, row-major.
    #[must_use]
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// Color at `(x, y)`, or `None` outside the raster.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgba(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a));
    }

    /// Whether every pixel equals `color`.
    #[must_use]
    pub fn is_uniform(&self, color: Color) -> bool {
        let px = premultiply(color);
        self.pixmap.pixels().iter().all(|p| *p == px)
    }

    /// Stroke a segment with round caps and joins.
    ///
    /// Consecutive segments of a stroke share their joint disc and a
    /// zero-length segment paints a dot. Returns the number of pixels whose
    /// value changed.
    pub fn stroke_segment(
        &mut self,
        from: Point,
        to: Point,
        width: f32,
        color: Color,
        composite: CompositeMode,
    ) -> usize {
        if !from.is_finite() || !to.is_finite() || !width.is_finite() || width <= 0.0 {
            return 0;
        }
        let Some(region) = self.stroke_region(from, to, width / 2.0) else {
            return 0;
        };
        let before = self.snapshot(region);

        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = true;
        paint.blend_mode = blend_mode(composite);

        if from.distance_sq(to) <= f32::EPSILON {
            if let Some(dot) = PathBuilder::from_circle(from.x, from.y, width / 2.0) {
                self.pixmap
                    .fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
            }
        } else {
            let mut pb = PathBuilder::new();
            pb.move_to(from.x, from.y);
            pb.line_to(to.x, to.y);
            if let Some(path) = pb.finish() {
                let stroke = Stroke {
                    width,
                    line_cap: LineCap::Round,
                    line_join: LineJoin::Round,
                    ..Stroke::default()
                };
                self.pixmap
                    .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }

        self.snapshot(region)
            .iter()
            .zip(&before)
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Pixels a stroke of `radius` around the segment may touch, clipped to
    /// the raster. `None` when the stroke lies entirely outside.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn stroke_region(&self, from: Point, to: Point, radius: f32) -> Option<Region> {
        let reach = radius + AA_MARGIN;
        let width = self.width() as f32;
        let height = self.height() as f32;

        let left = (from.x.min(to.x) - reach).floor().max(0.0);
        let top = (from.y.min(to.y) - reach).floor().max(0.0);
        let right = (from.x.max(to.x) + reach).ceil().min(width);
        let bottom = (from.y.max(to.y) + reach).ceil().min(height);
        if left >= right || top >= bottom {
            return None;
        }

        Some(Region {
            x0: left as u32,
            y0: top as u32,
            x1: right as u32,
            y1: bottom as u32,
        })
    }

    fn snapshot(&self, region: Region) -> Vec<PremultipliedColorU8> {
        let stride = self.width() as usize;
        let pixels = self.pixmap.pixels();
        (region.y0..region.y1)
            .flat_map(|y| {
                let row = y as usize * stride;
                pixels[row + region.x0 as usize..row + region.x1 as usize]
                    .iter()
                    .copied()
            })
            .collect()
    }
}

fn premultiply(color: Color) -> PremultipliedColorU8 {
    ColorU8::from_rgba(color.r, color.g, color.b, color.a).premultiply()
}

fn blend_mode(composite: CompositeMode) -> BlendMode {
    match composite {
        CompositeMode::SourceOver => BlendMode::SourceOver,
        CompositeMode::DestinationOut => BlendMode::DestinationOut,
    }
}
