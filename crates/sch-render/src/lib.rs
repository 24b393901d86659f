//! Rendering layer for the staged schematic
//!
//! [`SchematicRenderer`] draws a full frame onto any [`Surface`]. Three
//! surfaces ship with the crate: [`DisplayList`], a headless recorder used by
//! tests and tools, [`RasterSurface`], which rasterizes into a tiny-skia
//! pixmap, and [`PainterSurface`], which paints through egui.

mod display_list;
mod painter;
mod path;
mod raster;
mod renderer;
mod transform;

pub use display_list::{DisplayList, DrawCommand};
pub use painter::PainterSurface;
pub use path::{Path, PathBuilder, SubPath};
pub use raster::{PlacedText, RasterSurface};
pub use renderer::{SchematicRenderer, FrameStats};
pub use tiny_skia::Transform;
pub use transform::{map_len, map_point, TransformStack};

use egui::{Color32, Pos2, Vec2};
use sch_core::SurfaceGeometry;

/// Average glyph advance as a fraction of the font size
const GLYPH_ADVANCE: f32 = 0.6;

/// Text width for surfaces without a font rasterizer
pub(crate) fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * GLYPH_ADVANCE
}

/// How the ends of open subpaths are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
}

/// How consecutive segments meet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Round,
}

/// Stroke parameters for [`Surface::stroke_path`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub color: Color32,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl StrokeStyle {
    pub fn new(width: f32, color: Color32) -> Self {
        Self {
            width,
            color,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
        }
    }

    /// Round caps and joins
    pub fn rounded(mut self) -> Self {
        self.cap = LineCap::Round;
        self.join = LineJoin::Round;
        self
    }
}

/// A 2D drawing surface with a canvas-style transform stack.
///
/// Coordinates passed to drawing calls are in the current user space; the
/// surface maps them through its transform stack.
pub trait Surface {
    /// Whether the surface can be drawn to right now
    fn is_available(&self) -> bool {
        true
    }

    /// Adapt to a new viewport size / pixel density. Resets the transform
    /// stack to the base scale of the new geometry.
    fn configure(&mut self, geometry: &SurfaceGeometry);

    /// Erase everything drawn so far
    fn clear(&mut self);

    fn transform_stack(&self) -> &TransformStack;

    fn transform_stack_mut(&mut self) -> &mut TransformStack;

    /// Push the current transform
    fn save(&mut self) {
        self.transform_stack_mut().save();
    }

    /// Pop the last saved transform
    fn restore(&mut self) {
        self.transform_stack_mut().restore();
    }

    fn translate(&mut self, delta: Vec2) {
        self.transform_stack_mut().translate(delta);
    }

    fn scale(&mut self, factor: f32) {
        self.transform_stack_mut().scale(factor);
    }

    /// Number of unrestored saves
    fn depth(&self) -> usize {
        self.transform_stack().depth()
    }

    /// Fill a disc of `outer_radius` with a radial gradient that is solid
    /// `inner` up to `inner_radius` and fades to `outer` at the rim.
    fn fill_radial_gradient(
        &mut self,
        center: Pos2,
        inner_radius: f32,
        outer_radius: f32,
        inner: Color32,
        outer: Color32,
    );

    /// Fill the closed subpaths of a convex path
    fn fill_path(&mut self, path: &Path, color: Color32);

    fn stroke_path(&mut self, path: &Path, style: &StrokeStyle);

    /// Width of `text` in user-space units, unaffected by the transform
    fn measure_text(&self, text: &str, font_size: f32) -> f32;

    /// Draw `text` centered on `center`
    fn fill_text(&mut self, text: &str, center: Pos2, font_size: f32, color: Color32);
}
