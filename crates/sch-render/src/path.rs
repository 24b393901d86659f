//! Vector paths built with canvas-style commands on top of tiny-skia
//!
//! Curves stay curves until a backend asks for polylines; flattening goes
//! through epaint's bezier shapes in device space.

use egui::epaint::{CubicBezierShape, QuadraticBezierShape};
use egui::{Color32, Pos2, Rect, Stroke, pos2};
use tiny_skia::{PathSegment, Point, Transform};

/// Maximum distance between a curve and its flattened polyline, in device pixels
const FLATTEN_TOLERANCE: f32 = 0.1;

/// Cubic control distance for a quarter circle of radius 1
const KAPPA: f32 = 0.552_284_8;

/// A connected run of device-space points
#[derive(Debug, Clone, PartialEq)]
pub struct SubPath {
    pub points: Vec<Pos2>,
    pub closed: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    inner: Option<tiny_skia::Path>,
}

impl Path {
    pub fn builder() -> PathBuilder {
        PathBuilder::default()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// The underlying tiny-skia path, if anything was drawn
    pub fn as_tiny_skia(&self) -> Option<&tiny_skia::Path> {
        self.inner.as_ref()
    }

    /// Open polyline through `points`
    pub fn polyline(points: impl IntoIterator<Item = Pos2>) -> Path {
        let mut builder = PathBuilder::default();
        for p in points {
            builder.line_to(p);
        }
        builder.build()
    }

    pub fn rounded_rect(rect: Rect, radius: f32) -> Path {
        let mut builder = PathBuilder::default();
        builder.rounded_rect(rect, radius);
        builder.build()
    }

    /// Map through `transform` and flatten into polylines. Subpaths with
    /// fewer than two points draw nothing and are dropped.
    pub fn flatten(&self, transform: Transform) -> Vec<SubPath> {
        let Some(path) = self.inner.clone().and_then(|p| p.transform(transform)) else {
            return Vec::new();
        };

        let mut subpaths = Vec::new();
        let mut points: Vec<Pos2> = Vec::new();

        for segment in path.segments() {
            match segment {
                PathSegment::MoveTo(p) => {
                    finish_subpath(&mut subpaths, &mut points, false);
                    points.push(to_pos(p));
                }
                PathSegment::LineTo(p) => points.push(to_pos(p)),
                PathSegment::QuadTo(ctrl, end) => {
                    let start = points.last().copied().unwrap_or(to_pos(end));
                    let curve = QuadraticBezierShape::from_points_stroke(
                        [start, to_pos(ctrl), to_pos(end)],
                        false,
                        Color32::TRANSPARENT,
                        Stroke::NONE,
                    );
                    points.extend(curve.flatten(Some(FLATTEN_TOLERANCE)).into_iter().skip(1));
                }
                PathSegment::CubicTo(ctrl1, ctrl2, end) => {
                    let start = points.last().copied().unwrap_or(to_pos(end));
                    let curve = CubicBezierShape::from_points_stroke(
                        [start, to_pos(ctrl1), to_pos(ctrl2), to_pos(end)],
                        false,
                        Color32::TRANSPARENT,
                        Stroke::NONE,
                    );
                    points.extend(curve.flatten(Some(FLATTEN_TOLERANCE)).into_iter().skip(1));
                }
                PathSegment::Close => finish_subpath(&mut subpaths, &mut points, true),
            }
        }
        finish_subpath(&mut subpaths, &mut points, false);

        subpaths
    }
}

fn to_pos(p: Point) -> Pos2 {
    pos2(p.x, p.y)
}

fn finish_subpath(subpaths: &mut Vec<SubPath>, points: &mut Vec<Pos2>, closed: bool) {
    let points = std::mem::take(points);
    if points.len() >= 2 {
        subpaths.push(SubPath { points, closed });
    }
}

/// Incremental path construction with 2D-canvas semantics
pub struct PathBuilder {
    inner: tiny_skia::PathBuilder,
    has_current_point: bool,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self {
            inner: tiny_skia::PathBuilder::new(),
            has_current_point: false,
        }
    }
}

impl PathBuilder {
    pub fn move_to(&mut self, p: Pos2) -> &mut Self {
        self.inner.move_to(p.x, p.y);
        self.has_current_point = true;
        self
    }

    /// Without a current point this behaves like `move_to`
    pub fn line_to(&mut self, p: Pos2) -> &mut Self {
        if !self.has_current_point {
            return self.move_to(p);
        }
        self.inner.line_to(p.x, p.y);
        self
    }

    pub fn quad_to(&mut self, ctrl: Pos2, end: Pos2) -> &mut Self {
        if !self.has_current_point {
            return self.move_to(end);
        }
        self.inner.quad_to(ctrl.x, ctrl.y, end.x, end.y);
        self
    }

    /// Full circle starting at angle 0. Like a canvas arc, an existing
    /// current point is joined to the circle's start with a straight line.
    pub fn arc(&mut self, center: Pos2, radius: f32) -> &mut Self {
        let (cx, cy, r) = (center.x, center.y, radius);
        let k = KAPPA * r;

        self.line_to(pos2(cx + r, cy));
        self.inner.cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
        self.inner.cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
        self.inner.cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
        self.inner.cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
        self
    }

    pub fn close(&mut self) -> &mut Self {
        if self.has_current_point {
            self.inner.close();
        }
        self
    }

    /// Axis-aligned rectangle as a closed subpath
    pub fn rect(&mut self, rect: Rect) -> &mut Self {
        self.move_to(rect.left_top())
            .line_to(rect.right_top())
            .line_to(rect.right_bottom())
            .line_to(rect.left_bottom())
            .close()
    }

    /// Rectangle with quadratic corners of `radius`
    pub fn rounded_rect(&mut self, rect: Rect, radius: f32) -> &mut Self {
        let (x, y, w, h) = (rect.min.x, rect.min.y, rect.width(), rect.height());
        let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);

        self.move_to(pos2(x + r, y))
            .line_to(pos2(x + w - r, y))
            .quad_to(pos2(x + w, y), pos2(x + w, y + r))
            .line_to(pos2(x + w, y + h - r))
            .quad_to(pos2(x + w, y + h), pos2(x + w - r, y + h))
            .line_to(pos2(x + r, y + h))
            .quad_to(pos2(x, y + h), pos2(x, y + h - r))
            .line_to(pos2(x, y + r))
            .quad_to(pos2(x, y), pos2(x + r, y))
            .close()
    }

    /// Finish the path. A path made of nothing but a move is empty.
    pub fn build(&mut self) -> Path {
        self.has_current_point = false;
        Path {
            inner: std::mem::replace(&mut self.inner, tiny_skia::PathBuilder::new()).finish(),
        }
    }
}
