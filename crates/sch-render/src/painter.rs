//! egui backend for [`Surface`]

use std::f32::consts::TAU;
use egui::{Align2, Color32, FontId, Mesh, Painter, Pos2, Shape, Stroke, vec2};
use sch_core::SurfaceGeometry;
use tiny_skia::Transform;

use crate::path::Path;
use crate::transform::{map_len, map_point, TransformStack};
use crate::{LineCap, LineJoin, StrokeStyle, Surface};

/// Triangles around the glow disc
const GLOW_SEGMENTS: u32 = 64;

/// Paints into an egui [`Painter`], with logical (0, 0) at `origin`.
///
/// egui rebuilds its shape list every frame and applies the pixel density
/// itself, so the base transform only carries the on-screen display scale.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    origin: Pos2,
    transforms: TransformStack,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter, origin: Pos2) -> Self {
        Self {
            painter,
            origin,
            transforms: TransformStack::new(Transform::from_translate(origin.x, origin.y)),
        }
    }

    fn round_dots(&self, points: &[Pos2], radius: f32, color: Color32) {
        for p in points {
            self.painter.circle_filled(*p, radius, color);
        }
    }
}

impl Surface for PainterSurface<'_> {
    /// Nothing can be painted once the clip rect is empty
    fn is_available(&self) -> bool {
        !self.painter.clip_rect().is_negative()
    }

    fn configure(&mut self, geometry: &SurfaceGeometry) {
        let scale = geometry.display_scale;
        let base = Transform::from_translate(self.origin.x, self.origin.y).pre_scale(scale, scale);
        self.transforms.reset(base);
    }

    fn clear(&mut self) {
        // egui starts every frame from an empty shape list
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
        let t = self.transforms.current();
        let center = map_point(&t, center);
        let r0 = map_len(&t, inner_radius);
        let r1 = map_len(&t, outer_radius);

        let mut mesh = Mesh::default();
        mesh.colored_vertex(center, inner);
        for i in 0..=GLOW_SEGMENTS {
            let angle = TAU * i as f32 / GLOW_SEGMENTS as f32;
            let dir = vec2(angle.cos(), angle.sin());
            mesh.colored_vertex(center + dir * r0, inner);
            mesh.colored_vertex(center + dir * r1, outer);
        }
        for i in 0..GLOW_SEGMENTS {
            let in_a = 1 + 2 * i;
            let out_a = in_a + 1;
            let in_b = in_a + 2;
            let out_b = in_a + 3;
            mesh.add_triangle(0, in_a, in_b);
            mesh.add_triangle(in_a, out_a, out_b);
            mesh.add_triangle(in_a, out_b, in_b);
        }
        self.painter.add(Shape::mesh(mesh));
    }

    fn fill_path(&mut self, path: &Path, color: Color32) {
        for sub in path.flatten(self.transforms.current()) {
            if sub.closed && sub.points.len() >= 3 {
                self.painter.add(Shape::convex_polygon(sub.points, color, Stroke::NONE));
            }
        }
    }

    fn stroke_path(&mut self, path: &Path, style: &StrokeStyle) {
        let t = self.transforms.current();
        let width = map_len(&t, style.width);
        let stroke = Stroke::new(width, style.color);

        for sub in path.flatten(t) {
            if style.join == LineJoin::Round {
                self.round_dots(&sub.points, width / 2.0, style.color);
            } else if style.cap == LineCap::Round && !sub.closed {
                if let (Some(first), Some(last)) = (sub.points.first(), sub.points.last()) {
                    self.round_dots(&[*first, *last], width / 2.0, style.color);
                }
            }

            if sub.closed {
                self.painter.add(Shape::closed_line(sub.points, stroke));
            } else {
                self.painter.add(Shape::line(sub.points, stroke));
            }
        }
    }

    fn measure_text(&self, text: &str, font_size: f32) -> f32 {
        self.painter
            .layout_no_wrap(text.to_string(), FontId::proportional(font_size), Color32::WHITE)
            .size()
            .x
    }

    fn fill_text(&mut self, text: &str, center: Pos2, font_size: f32, color: Color32) {
        let t = self.transforms.current();
        self.painter.text(
            map_point(&t, center),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(map_len(&t, font_size)),
            color,
        );
    }
}
