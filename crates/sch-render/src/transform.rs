//! Canvas-style save/restore stack over [`tiny_skia::Transform`]

use egui::{Pos2, Vec2, pos2};
use tiny_skia::{Point, Transform};

/// Map a user-space point to device space
pub fn map_point(transform: &Transform, p: Pos2) -> Pos2 {
    let mut points = [Point::from_xy(p.x, p.y)];
    transform.map_points(&mut points);
    pos2(points[0].x, points[0].y)
}

/// Map a user-space length. The stack only composes translations and
/// uniform scales, so the x axis scale holds for every direction.
pub fn map_len(transform: &Transform, len: f32) -> f32 {
    len * transform.sx.hypot(transform.ky)
}

/// Current transform plus the saved ones, like a 2D canvas context
#[derive(Debug, Clone, Default)]
pub struct TransformStack {
    current: Transform,
    saved: Vec<Transform>,
}

impl TransformStack {
    pub fn new(base: Transform) -> Self {
        Self {
            current: base,
            saved: Vec::new(),
        }
    }

    /// Drop all saved state and start over from `base`
    pub fn reset(&mut self, base: Transform) {
        self.current = base;
        self.saved.clear();
    }

    pub fn current(&self) -> Transform {
        self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// No-op when nothing is saved
    pub fn restore(&mut self) {
        if let Some(previous) = self.saved.pop() {
            self.current = previous;
        }
    }

    /// Translate in the current user space
    pub fn translate(&mut self, delta: Vec2) {
        self.current = self.current.pre_translate(delta.x, delta.y);
    }

    /// Scale in the current user space
    pub fn scale(&mut self, factor: f32) {
        self.current = self.current.pre_scale(factor, factor);
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}
