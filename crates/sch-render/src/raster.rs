//! tiny-skia backend for [`Surface`]
//!
//! Rasterizes frames into a [`Pixmap`] sized to the device pixels of the
//! configured geometry. tiny-skia has no text shaping, so labels are kept as
//! [`PlacedText`] for the host to overlay.

use egui::{Color32, Pos2};
use sch_core::SurfaceGeometry;
use tiny_skia::{
    Color, FillRule, GradientStop, Paint, Pixmap, Point, RadialGradient, SpreadMode, Stroke,
    Transform,
};
use tracing::debug;

use crate::path::Path;
use crate::transform::{map_len, map_point, TransformStack};
use crate::{estimate_text_width, LineCap, LineJoin, StrokeStyle, Surface};

/// A label placed in device space
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub center: Pos2,
    pub font_size: f32,
    pub color: Color32,
}

#[derive(Default)]
pub struct RasterSurface {
    pixmap: Option<Pixmap>,
    transforms: TransformStack,
    texts: Vec<PlacedText>,
}

impl RasterSurface {
    /// An unconfigured surface; it has no pixels until [`Surface::configure`]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Raw premultiplied RGBA bytes of the last frame
    pub fn data(&self) -> &[u8] {
        self.pixmap.as_ref().map(|p| p.data()).unwrap_or(&[])
    }

    pub fn texts(&self) -> &[PlacedText] {
        &self.texts
    }

    /// Unpremultiplied color of a device pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        let c = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some(Color32::from_rgba_unmultiplied(c.red(), c.green(), c.blue(), c.alpha()))
    }
}

fn to_color(c: Color32) -> Color {
    let [r, g, b, a] = c.to_srgba_unmultiplied();
    Color::from_rgba8(r, g, b, a)
}

fn solid_paint(color: Color32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_color(color));
    paint.anti_alias = true;
    paint
}

impl Surface for RasterSurface {
    fn is_available(&self) -> bool {
        self.pixmap.is_some()
    }

    fn configure(&mut self, geometry: &SurfaceGeometry) {
        let [width, height] = geometry.physical_size();
        self.pixmap = Pixmap::new(width, height);
        if self.pixmap.is_none() {
            debug!(width, height, "Zero-sized raster surface");
        }

        let scale = geometry.device_scale();
        self.transforms.reset(Transform::from_scale(scale, scale));
        self.texts.clear();
    }

    fn clear(&mut self) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(Color::TRANSPARENT);
        }
        self.texts.clear();
    }

    fn transform_stack(&self) -> &TransformStack {
        &self.transforms
    }

    fn transform_stack_mut(&mut self) -> &mut TransformStack {
        &mut self.transforms
    }

    fn fill_radial_gradient(
        &mut self,
        center: Pos2,
        inner_radius: f32,
        outer_radius: f32,
        inner: Color32,
        outer: Color32,
    ) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        if !(outer_radius > 0.0) {
            return;
        }

        let solid_until = (inner_radius / outer_radius).clamp(0.0, 1.0);
        let focus = Point::from_xy(center.x, center.y);
        let Some(shader) = RadialGradient::new(
            focus,
            focus,
            outer_radius,
            vec![
                GradientStop::new(0.0, to_color(inner)),
                GradientStop::new(solid_until, to_color(inner)),
                GradientStop::new(1.0, to_color(outer)),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        ) else {
            return;
        };
        let Some(disc) = tiny_skia::PathBuilder::from_circle(center.x, center.y, outer_radius) else {
            return;
        };

        let mut paint = Paint::default();
        paint.shader = shader;
        paint.anti_alias = true;
        pixmap.fill_path(&disc, &paint, FillRule::Winding, self.transforms.current(), None);
    }

    fn fill_path(&mut self, path: &Path, color: Color32) {
        let (Some(pixmap), Some(path)) = (self.pixmap.as_mut(), path.as_tiny_skia()) else {
            return;
        };
        pixmap.fill_path(
            path,
            &solid_paint(color),
            FillRule::Winding,
            self.transforms.current(),
            None,
        );
    }

    fn stroke_path(&mut self, path: &Path, style: &StrokeStyle) {
        let (Some(pixmap), Some(path)) = (self.pixmap.as_mut(), path.as_tiny_skia()) else {
            return;
        };

        let stroke = Stroke {
            width: style.width,
            line_cap: match style.cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
            },
            line_join: match style.join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
            },
            ..Stroke::default()
        };
        pixmap.stroke_path(path, &solid_paint(style.color), &stroke, self.transforms.current(), None);
    }

    fn measure_text(&self, text: &str, font_size: f32) -> f32 {
        estimate_text_width(text, font_size)
    }

    fn fill_text(&mut self, text: &str, center: Pos2, font_size: f32, color: Color32) {
        let t = self.transforms.current();
        self.texts.push(PlacedText {
            text: text.to_string(),
            center: map_point(&t, center),
            font_size: map_len(&t, font_size),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchematicRenderer;
    use egui::vec2;
    use sch_core::{RenderTransform, Scene, SchematicConfig, FINAL_STAGE};

    fn renderer() -> SchematicRenderer {
        SchematicRenderer::new(Scene::reference(), &SchematicConfig::default())
    }

    fn configured(pixels_per_point: f32) -> RasterSurface {
        let mut surface = RasterSurface::new();
        surface.configure(&SurfaceGeometry::fit(vec2(800.0, 500.0), 1920.0, pixels_per_point));
        surface
    }

    #[test]
    fn test_unconfigured_surface_skips_frames() {
        let mut surface = RasterSurface::new();
        assert!(!surface.is_available());
        assert!(renderer().draw_frame(&mut surface, FINAL_STAGE, &RenderTransform::default()).is_none());
        assert!(surface.data().is_empty());
    }

    #[test]
    fn test_configure_sizes_pixmap_in_device_pixels() {
        let surface = configured(2.0);
        let pixmap = surface.pixmap().unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (1600, 1000));
    }

    #[test]
    fn test_redraw_is_pixel_identical() {
        let renderer = renderer();
        let mut surface = configured(1.0);
        let mut transform = RenderTransform::default();
        transform.set_zoom(1.3);

        renderer.draw_frame(&mut surface, 7, &transform).unwrap();
        let first = surface.data().to_vec();
        let first_texts = surface.texts().to_vec();
        renderer.draw_frame(&mut surface, 7, &transform).unwrap();

        assert_eq!(surface.data(), first.as_slice());
        assert_eq!(surface.texts(), first_texts.as_slice());
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_revealed_wire_changes_pixels() {
        let renderer = renderer();
        let wire = renderer.scene().wires.iter().find(|w| w.min_stage == 1).unwrap();
        let a = renderer.chip().chip_to_canvas(wire.points[0]);
        let b = renderer.chip().chip_to_canvas(wire.points[1]);
        let mid = a + (b - a) / 2.0;
        let (x, y) = (mid.x.round() as u32, mid.y.round() as u32);

        let mut surface = configured(1.0);
        renderer.draw_frame(&mut surface, 0, &RenderTransform::default()).unwrap();
        let before = surface.pixel(x, y).unwrap();
        renderer.draw_frame(&mut surface, 1, &RenderTransform::default()).unwrap();
        let after = surface.pixel(x, y).unwrap();

        assert_ne!(before, after);
    }

    #[test]
    fn test_labels_are_placed_not_rasterized() {
        let mut surface = configured(2.0);
        renderer().draw_frame(&mut surface, FINAL_STAGE, &RenderTransform::default()).unwrap();
        assert_eq!(surface.texts().len(), 7);
        assert!(surface.texts().iter().all(|t| (t.font_size - 22.0).abs() < 1e-4));
    }
}
