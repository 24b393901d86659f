//! Full-frame schematic renderer

use egui::{Color32, Pos2, Rect, pos2, vec2};
use sch_core::{
    ChipGeometry, ColorToken, Gate, GateVariant, LabelBox, RenderTransform, Reveal,
    Scene, SchematicConfig, Stage, StyleConfig, Wire,
};
use tracing::trace;

use crate::path::Path;
use crate::{StrokeStyle, Surface};

/// What one frame drew
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub stage: Stage,
    pub wires: usize,
    pub gates: usize,
    pub labels: usize,
    /// Visible entities that could not be drawn
    pub skipped: usize,
}

/// Draws the chip and every scene entity revealed at the current stage
#[derive(Debug, Clone)]
pub struct SchematicRenderer {
    scene: Scene,
    chip: ChipGeometry,
    style: StyleConfig,
}

impl SchematicRenderer {
    pub fn new(scene: Scene, config: &SchematicConfig) -> Self {
        Self {
            scene,
            chip: config.chip_geometry(),
            style: config.style.clone(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn chip(&self) -> &ChipGeometry {
        &self.chip
    }

    /// Redraw the whole surface. Returns `None` without touching the surface
    /// when it is not available. The transform stack is left exactly as it
    /// was found, so repeated calls never compound.
    pub fn draw_frame(
        &self,
        surface: &mut dyn Surface,
        stage: Stage,
        transform: &RenderTransform,
    ) -> Option<FrameStats> {
        if !surface.is_available() {
            trace!("Surface unavailable, skipping frame");
            return None;
        }

        let mut stats = FrameStats {
            stage,
            ..FrameStats::default()
        };

        surface.clear();

        // zoom about the surface center, then pan
        let center = self.chip.center().to_vec2();
        surface.save();
        surface.translate(center);
        surface.scale(transform.zoom());
        surface.translate(-center + transform.offset);

        self.draw_glow(surface);
        self.draw_chip_body(surface);

        for (index, wire) in self.scene.wires.iter().enumerate() {
            if !wire.visible_at(stage) {
                continue;
            }
            if self.draw_wire(surface, wire) {
                stats.wires += 1;
            } else {
                trace!(index, "Skipping malformed wire");
                stats.skipped += 1;
            }
        }

        for (index, gate) in self.scene.gates.iter().enumerate() {
            if !gate.visible_at(stage) {
                continue;
            }
            if self.draw_gate(surface, gate) {
                stats.gates += 1;
            } else {
                trace!(index, "Skipping malformed gate");
                stats.skipped += 1;
            }
        }

        for (index, label) in self.scene.labels.iter().enumerate() {
            if !label.visible_at(stage) {
                continue;
            }
            if self.draw_label(surface, label) {
                stats.labels += 1;
            } else {
                trace!(index, "Skipping malformed label");
                stats.skipped += 1;
            }
        }

        surface.restore();

        trace!(
            stage,
            wires = stats.wires,
            gates = stats.gates,
            labels = stats.labels,
            "Frame drawn"
        );
        Some(stats)
    }

    fn draw_glow(&self, surface: &mut dyn Surface) {
        let (inner_radius, outer_radius) = self.chip.glow_radii();
        surface.fill_radial_gradient(
            self.chip.center(),
            inner_radius,
            outer_radius,
            Color32::from_rgba_unmultiplied(16, 185, 129, 71),
            Color32::TRANSPARENT,
        );
    }

    fn draw_chip_body(&self, surface: &mut dyn Surface) {
        let body = Path::rounded_rect(self.chip.chip_rect(), self.chip.corner_radius);
        surface.fill_path(&body, Color32::from_rgba_unmultiplied(10, 15, 26, 102));
        surface.stroke_path(
            &body,
            &StrokeStyle::new(self.style.chip_outline_width, ColorToken::Emerald.color32()),
        );
    }

    fn draw_wire(&self, surface: &mut dyn Surface, wire: &Wire) -> bool {
        if !wire.is_drawable() {
            return false;
        }

        let path = Path::polyline(wire.points.iter().map(|p| self.chip.chip_to_canvas(*p)));
        surface.stroke_path(
            &path,
            &StrokeStyle::new(self.style.wire_width, wire.color.color32()).rounded(),
        );
        true
    }

    fn draw_gate(&self, surface: &mut dyn Surface, gate: &Gate) -> bool {
        if !gate.is_drawable() {
            return false;
        }

        let at = self.chip.chip_to_canvas(gate.position);
        let style = StrokeStyle::new(self.style.gate_line_width, gate.variant.color().color32()).rounded();

        surface.save();
        surface.translate(at.to_vec2());
        for path in gate_icon(gate.variant, self.style.gate_scale) {
            surface.stroke_path(&path, &style);
        }
        surface.restore();
        true
    }

    fn draw_label(&self, surface: &mut dyn Surface, label: &LabelBox) -> bool {
        if !label.is_drawable() {
            return false;
        }

        let at = self.chip.chip_to_canvas(label.position);
        let color = label.color.color32();
        let font_size = self.style.label_font_size;

        let w = surface.measure_text(&label.text, font_size) + self.style.label_pad_x * 2.0;
        let h = self.style.label_height;
        let rect = Rect::from_center_size(at, vec2(w, h));
        let body = Path::rounded_rect(rect, self.style.label_radius);

        surface.fill_path(&body, Color32::from_rgba_unmultiplied(0, 0, 0, 89));
        surface.stroke_path(&body, &StrokeStyle::new(self.style.label_line_width, color));
        surface.fill_text(&label.text, at + vec2(0.0, 0.5), font_size, color);
        true
    }
}

/// Stroke paths of a gate symbol centered on the origin
fn gate_icon(variant: GateVariant, scale: f32) -> Vec<Path> {
    let p = |x: f32, y: f32| -> Pos2 { pos2(x * scale, y * scale) };

    match variant {
        GateVariant::AndLike => {
            let mut inputs = Path::builder();
            inputs
                .move_to(p(-10.0, -6.0)).line_to(p(-4.0, -6.0))
                .move_to(p(-10.0, 6.0)).line_to(p(-4.0, 6.0));

            let mut body = Path::builder();
            body.move_to(p(-4.0, -10.0))
                .line_to(p(-4.0, 10.0))
                .quad_to(p(8.0, 10.0), p(8.0, 0.0))
                .quad_to(p(8.0, -10.0), p(-4.0, -10.0));

            let mut output = Path::builder();
            output.move_to(p(8.0, 0.0)).line_to(p(12.0, 0.0)).arc(p(14.0, 0.0), 2.0 * scale);

            vec![inputs.build(), body.build(), output.build()]
        }
        GateVariant::NotLike => {
            let mut input = Path::builder();
            input.move_to(p(-10.0, 0.0)).line_to(p(-2.0, 0.0));

            let mut triangle = Path::builder();
            triangle
                .move_to(p(-2.0, -8.0))
                .line_to(p(-2.0, 8.0))
                .line_to(p(8.0, 0.0))
                .close();

            let mut output = Path::builder();
            output
                .arc(p(10.0, 0.0), 2.0 * scale)
                .move_to(p(12.0, 0.0))
                .line_to(p(16.0, 0.0));

            vec![input.build(), triangle.build(), output.build()]
        }
        GateVariant::IcBlock => {
            let mut square = Path::builder();
            square.rect(Rect::from_min_max(p(-8.0, -8.0), p(8.0, 8.0)));

            let mut dot = Path::builder();
            dot.arc(p(0.0, 0.0), 3.0 * scale);

            let mut pins = Path::builder();
            pins.move_to(p(-10.0, -4.0)).line_to(p(-8.0, -4.0))
                .move_to(p(-10.0, 4.0)).line_to(p(-8.0, 4.0))
                .move_to(p(8.0, -4.0)).line_to(p(10.0, -4.0))
                .move_to(p(8.0, 4.0)).line_to(p(10.0, 4.0));

            vec![square.build(), dot.build(), pins.build()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sch_core::{SurfaceGeometry, FINAL_STAGE, NormPoint};
    use tiny_skia::Transform;
    use crate::{DisplayList, DrawCommand, SubPath};

    /// Device pixels per logical unit in `configured_list`
    const DEVICE_SCALE: f32 = 2.0;

    fn renderer() -> SchematicRenderer {
        SchematicRenderer::new(Scene::reference(), &SchematicConfig::default())
    }

    fn configured_list() -> DisplayList {
        let mut list = DisplayList::new();
        list.configure(&SurfaceGeometry::fit(vec2(800.0, 500.0), 1920.0, 2.0));
        list
    }

    fn stroke_count(list: &DisplayList) -> usize {
        list.commands().iter().filter(|c| matches!(c, DrawCommand::StrokePath { .. })).count()
    }

    fn strokes(list: &DisplayList) -> Vec<(&[SubPath], Color32)> {
        list.commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::StrokePath { subpaths, color, .. } => Some((subpaths.as_slice(), *color)),
                _ => None,
            })
            .collect()
    }

    fn assert_same_subpaths(actual: &[SubPath], expected: &[SubPath]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_eq!(a.closed, e.closed);
            assert_eq!(a.points.len(), e.points.len());
            for (p, q) in a.points.iter().zip(&e.points) {
                assert!((*p - *q).length() < 1e-3, "{:?} != {:?}", p, q);
            }
        }
    }

    #[test]
    fn test_full_reveal_draws_everything_once() {
        let renderer = renderer();
        let mut list = configured_list();
        let stats = renderer.draw_frame(&mut list, FINAL_STAGE, &RenderTransform::default()).unwrap();

        assert_eq!(stats.wires, 26);
        assert_eq!(stats.gates, 18);
        assert_eq!(stats.labels, 7);
        assert_eq!(stats.skipped, 0);

        // chip outline + one stroke per wire + three per gate + one per label
        assert_eq!(stroke_count(&list), 1 + 26 + 18 * 3 + 7);

        let mut texts: Vec<&str> = list.texts().collect();
        texts.sort_unstable();
        assert_eq!(texts, vec!["IN1", "IN2", "OUT1", "OUT2 LED", "OUT3", "VDD", "VSS"]);
    }

    #[test]
    fn test_stage_zero_draws_only_chip() {
        let renderer = renderer();
        let mut list = configured_list();
        let stats = renderer.draw_frame(&mut list, 0, &RenderTransform::default()).unwrap();

        assert_eq!(stats.wires + stats.gates + stats.labels, 0);
        let kinds: Vec<_> = list.commands().iter().map(std::mem::discriminant).collect();
        assert_eq!(kinds.len(), 4);
        assert!(matches!(list.commands()[0], DrawCommand::Clear { .. }));
        assert!(matches!(list.commands()[1], DrawCommand::RadialGradient { .. }));
        assert!(matches!(list.commands()[2], DrawCommand::FillPath { .. }));
        assert!(matches!(list.commands()[3], DrawCommand::StrokePath { .. }));
    }

    #[test]
    fn test_negative_and_overshoot_stages() {
        let renderer = renderer();
        let mut list = configured_list();
        let none = renderer.draw_frame(&mut list, -3, &RenderTransform::default()).unwrap();
        assert_eq!(none.wires + none.gates + none.labels, 0);

        let all = renderer.draw_frame(&mut list, 99, &RenderTransform::default()).unwrap();
        assert_eq!((all.wires, all.gates, all.labels), (26, 18, 7));
    }

    #[test]
    fn test_stats_match_scene_counts_at_every_stage() {
        let renderer = renderer();
        let mut list = configured_list();
        for stage in 0..=FINAL_STAGE {
            let stats = renderer.draw_frame(&mut list, stage, &RenderTransform::default()).unwrap();
            let counts = renderer.scene().visible_counts(stage);
            assert_eq!((stats.wires, stats.gates, stats.labels), (counts.wires, counts.gates, counts.labels));
        }
    }

    #[test]
    fn test_redraw_is_idempotent() {
        let renderer = renderer();
        let mut list = configured_list();
        let mut transform = RenderTransform::default();
        transform.set_zoom(1.7);

        renderer.draw_frame(&mut list, 6, &transform);
        let first = list.commands().to_vec();
        renderer.draw_frame(&mut list, 6, &transform);

        assert_eq!(list.commands(), first.as_slice());
        assert_eq!(list.depth(), 0);
    }

    #[test]
    fn test_layer_order_wires_gates_labels() {
        let renderer = renderer();
        let mut list = configured_list();
        renderer.draw_frame(&mut list, FINAL_STAGE, &RenderTransform::default());

        let wire_width = 4.0 * 2.0;
        let gate_width = 2.0 * 2.0;
        let commands = list.commands();
        let last_wire = commands.iter().rposition(|c| matches!(c, DrawCommand::StrokePath { width, .. } if *width == wire_width)).unwrap();
        let first_gate = commands.iter().position(|c| matches!(c, DrawCommand::StrokePath { width, cap: crate::LineCap::Round, .. } if *width == gate_width)).unwrap();
        let first_text = commands.iter().position(|c| matches!(c, DrawCommand::Text { .. })).unwrap();

        assert!(last_wire < first_gate);
        assert!(first_gate < first_text);
    }

    #[test]
    fn test_wires_stroked_in_declared_order() {
        let renderer = renderer();
        let mut list = configured_list();
        renderer.draw_frame(&mut list, FINAL_STAGE, &RenderTransform::default());

        // stroke 0 is the chip outline
        let strokes = strokes(&list);
        for (index, wire) in renderer.scene().wires.iter().enumerate() {
            let (subpaths, color) = strokes[1 + index];
            assert_eq!(color, wire.color.color32(), "wire {}", index);
            assert_eq!(subpaths.len(), 1);

            let expected: Vec<Pos2> = wire
                .points
                .iter()
                .map(|p| (renderer.chip().chip_to_canvas(*p).to_vec2() * DEVICE_SCALE).to_pos2())
                .collect();
            assert_eq!(subpaths[0].points.len(), expected.len(), "wire {}", index);
            for (p, q) in subpaths[0].points.iter().zip(&expected) {
                assert!((*p - *q).length() < 1e-3, "wire {}: {:?} != {:?}", index, p, q);
            }
        }
    }

    #[test]
    fn test_gate_icons_centered_and_colored() {
        let renderer = renderer();
        let mut list = configured_list();
        renderer.draw_frame(&mut list, FINAL_STAGE, &RenderTransform::default());

        let strokes = strokes(&list);
        let first_gate = 1 + renderer.scene().wires.len();
        for (index, gate) in renderer.scene().gates.iter().enumerate() {
            let at = renderer.chip().chip_to_canvas(gate.position);
            let placed = Transform::from_scale(DEVICE_SCALE, DEVICE_SCALE).pre_translate(at.x, at.y);
            let icon = gate_icon(gate.variant, 1.8);

            for (part, path) in icon.iter().enumerate() {
                let (subpaths, color) = strokes[first_gate + 3 * index + part];
                assert_eq!(color, gate.variant.color().color32(), "gate {}", index);
                assert_same_subpaths(subpaths, &path.flatten(placed));
            }
        }

        // the NOT triangle's centroid sits just right of the gate position
        let (index, gate) = renderer
            .scene()
            .gates
            .iter()
            .enumerate()
            .find(|(_, g)| g.variant == GateVariant::NotLike)
            .unwrap();
        let triangle = &strokes[first_gate + 3 * index + 1].0[0];
        assert!(triangle.closed);
        let sum = triangle.points.iter().fold(vec2(0.0, 0.0), |acc, p| acc + p.to_vec2());
        let centroid = sum / triangle.points.len() as f32;
        let at = renderer.chip().chip_to_canvas(gate.position).to_vec2() * DEVICE_SCALE;
        let expected = at + vec2(4.0 / 3.0 * 1.8, 0.0) * DEVICE_SCALE;
        assert!((centroid - expected).length() < 1e-2, "{:?} != {:?}", centroid, expected);
    }

    #[test]
    fn test_label_boxes_fit_text_and_center_on_position() {
        let renderer = renderer();
        let mut list = configured_list();
        renderer.draw_frame(&mut list, FINAL_STAGE, &RenderTransform::default());
        let commands = list.commands();

        for label in &renderer.scene().labels {
            let index = commands
                .iter()
                .position(|c| matches!(c, DrawCommand::Text { text, .. } if *text == label.text))
                .unwrap();
            let at = renderer.chip().chip_to_canvas(label.position);

            let DrawCommand::FillPath { subpaths, .. } = &commands[index - 2] else {
                panic!("label {} has no box", label.text);
            };
            let points = &subpaths[0].points;
            let min_x = points.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
            let max_x = points.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
            let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
            let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);

            let width = label.text.chars().count() as f32 * 11.0 * 0.6 + 2.0 * 12.0;
            assert!(((max_x - min_x) - width * DEVICE_SCALE).abs() < 1e-2, "{}", label.text);
            assert!(((max_y - min_y) - 20.0 * DEVICE_SCALE).abs() < 1e-2, "{}", label.text);
            assert!(((min_x + max_x) / 2.0 - at.x * DEVICE_SCALE).abs() < 1e-2, "{}", label.text);
            assert!(((min_y + max_y) / 2.0 - at.y * DEVICE_SCALE).abs() < 1e-2, "{}", label.text);

            match &commands[index] {
                DrawCommand::Text { center, color, .. } => {
                    assert!((*center - (vec2(at.x, at.y + 0.5) * DEVICE_SCALE).to_pos2()).length() < 1e-3);
                    assert_eq!(*color, label.color.color32());
                }
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn test_zoom_scales_about_center() {
        let renderer = renderer();
        let mut list = DisplayList::new();
        let mut transform = RenderTransform::default();
        transform.set_zoom(2.0);
        renderer.draw_frame(&mut list, 0, &transform);

        match &list.commands()[1] {
            DrawCommand::RadialGradient { center, outer_radius, .. } => {
                assert_eq!(*center, pos2(400.0, 250.0));
                assert!((*outer_radius - 800.0 * 0.8 * 2.0).abs() < 1e-3);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_surface_is_skipped() {
        let renderer = renderer();
        let mut list = DisplayList::detached();
        assert!(renderer.draw_frame(&mut list, FINAL_STAGE, &RenderTransform::default()).is_none());
        assert!(list.commands().is_empty());
    }

    #[test]
    fn test_malformed_entities_do_not_abort_frame() {
        let mut scene = Scene::reference();
        scene.wires.insert(0, Wire::new(1, ColorToken::Sky, &[[0.0, 0.0]]));
        scene.gates.push(Gate::new(GateVariant::IcBlock, f32::INFINITY, 0.0, 1));
        scene.labels.push(LabelBox {
            text: "BAD".to_string(),
            position: NormPoint::new(f32::NAN, 0.0),
            color: ColorToken::Sky,
            min_stage: 1,
        });
        let renderer = SchematicRenderer::new(scene, &SchematicConfig::default());

        let mut list = configured_list();
        let stats = renderer.draw_frame(&mut list, FINAL_STAGE, &RenderTransform::default()).unwrap();
        assert_eq!(stats.skipped, 3);
        assert_eq!((stats.wires, stats.gates, stats.labels), (26, 18, 7));
        assert_eq!(list.depth(), 0);
    }

    #[test]
    fn test_gate_icons_have_three_strokes() {
        for variant in [GateVariant::AndLike, GateVariant::NotLike, GateVariant::IcBlock] {
            let icon = gate_icon(variant, 1.8);
            assert_eq!(icon.len(), 3);
            assert!(icon.iter().all(|path| !path.is_empty()));
        }
    }
}
