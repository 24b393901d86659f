//! Headless surface that records device-space draw commands

use egui::{Color32, Pos2, Vec2};
use sch_core::SurfaceGeometry;

use tiny_skia::Transform;

use crate::path::{Path, SubPath};
use crate::transform::{map_len, map_point, TransformStack};
use crate::{estimate_text_width, LineCap, LineJoin, StrokeStyle, Surface};

/// A recorded draw call with every coordinate already transformed
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        size: Vec2,
    },
    RadialGradient {
        center: Pos2,
        inner_radius: f32,
        outer_radius: f32,
        inner: Color32,
        outer: Color32,
    },
    FillPath {
        subpaths: Vec<SubPath>,
        color: Color32,
    },
    StrokePath {
        subpaths: Vec<SubPath>,
        width: f32,
        color: Color32,
        cap: LineCap,
        join: LineJoin,
    },
    Text {
        text: String,
        center: Pos2,
        font_size: f32,
        color: Color32,
    },
}

/// Records what a frame would paint, in device space. Two frames that
/// record equal command lists produce identical pixels on any backend.
#[derive(Debug, Clone)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
    transforms: TransformStack,
    geometry: Option<SurfaceGeometry>,
    available: bool,
}

impl DisplayList {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            transforms: TransformStack::default(),
            geometry: None,
            available: true,
        }
    }

    /// A surface that is not attached to anything; every frame is skipped
    pub fn detached() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn geometry(&self) -> Option<&SurfaceGeometry> {
        self.geometry.as_ref()
    }

    /// Backing store size in device pixels, once configured
    pub fn physical_size(&self) -> Option<[u32; 2]> {
        self.geometry.map(|g| g.physical_size())
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for DisplayList {
    fn is_available(&self) -> bool {
        self.available
    }

    fn configure(&mut self, geometry: &SurfaceGeometry) {
        self.geometry = Some(*geometry);
        let scale = geometry.device_scale();
        self.transforms.reset(Transform::from_scale(scale, scale));
    }

    fn clear(&mut self) {
        self.commands.clear();
        let size = self
            .geometry
            .map(|g| {
                let [w, h] = g.physical_size();
                Vec2::new(w as f32, h as f32)
            })
            .unwrap_or(Vec2::ZERO);
        self.commands.push(DrawCommand::Clear { size });
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
        self.commands.push(DrawCommand::RadialGradient {
            center: map_point(&t, center),
            inner_radius: map_len(&t, inner_radius),
            outer_radius: map_len(&t, outer_radius),
            inner,
            outer,
        });
    }

    fn fill_path(&mut self, path: &Path, color: Color32) {
        let subpaths = path.flatten(self.transforms.current());
        self.commands.push(DrawCommand::FillPath { subpaths, color });
    }

    fn stroke_path(&mut self, path: &Path, style: &StrokeStyle) {
        let t = self.transforms.current();
        self.commands.push(DrawCommand::StrokePath {
            subpaths: path.flatten(t),
            width: map_len(&t, style.width),
            color: style.color,
            cap: style.cap,
            join: style.join,
        });
    }

    fn measure_text(&self, text: &str, font_size: f32) -> f32 {
        estimate_text_width(text, font_size)
    }

    fn fill_text(&mut self, text: &str, center: Pos2, font_size: f32, color: Color32) {
        let t = self.transforms.current();
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            center: map_point(&t, center),
            font_size: map_len(&t, font_size),
            color,
        });
    }
}
