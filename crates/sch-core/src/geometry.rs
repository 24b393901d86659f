//! Chip geometry, the normalized-to-canvas mapper and the view transform

use egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::config::ZoomConfig;
use crate::scene::NormPoint;

/// Fraction of the viewport width the canvas may occupy
const MAX_VIEWPORT_FRACTION: f32 = 0.9;

/// Geometry of the chip drawn on a surface of the same logical size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChipGeometry {
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    pub padding_ratio: f32,
}

impl Default for ChipGeometry {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            corner_radius: 16.0,
            padding_ratio: 0.1,
        }
    }
}

impl ChipGeometry {
    /// Logical size of the surface the chip is centered on
    pub fn surface_size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    pub fn center(&self) -> Pos2 {
        pos2(self.width / 2.0, self.height / 2.0)
    }

    /// Outline of the chip body
    pub fn chip_rect(&self) -> Rect {
        Rect::from_center_size(self.center(), vec2(self.width, self.height))
    }

    /// The padded interior that normalized coordinates span
    pub fn inner_rect(&self) -> Rect {
        let pad = vec2(self.width * self.padding_ratio, self.height * self.padding_ratio);
        let chip = self.chip_rect();
        Rect::from_min_max(chip.min + pad, chip.max - pad)
    }

    /// Map a normalized `[-1, 1]` coordinate into the padded chip interior.
    ///
    /// Values outside the range are extrapolated linearly.
    pub fn chip_to_canvas(&self, norm: NormPoint) -> Pos2 {
        let chip = self.chip_rect();
        let pad_x = self.width * self.padding_ratio;
        let pad_y = self.height * self.padding_ratio;
        let inner_w = self.width - pad_x * 2.0;
        let inner_h = self.height - pad_y * 2.0;

        pos2(
            chip.min.x + pad_x + (norm.x + 1.0) / 2.0 * inner_w,
            chip.min.y + pad_y + (norm.y + 1.0) / 2.0 * inner_h,
        )
    }

    /// Radii of the decorative glow under the chip
    pub fn glow_radii(&self) -> (f32, f32) {
        (
            self.width.min(self.height) * 0.2,
            self.width.max(self.height) * 0.8,
        )
    }
}

/// Zoom/pan state local to one mounted view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTransform {
    zoom: f32,
    /// Pan offset. Kept in the transform but no input path sets it.
    pub offset: Vec2,
    min_zoom: f32,
    max_zoom: f32,
    step: f32,
}

impl RenderTransform {
    /// Limits are taken as given when usable. An inverted range is
    /// reordered; a non-finite or non-positive one falls back to the defaults.
    pub fn new(limits: &ZoomConfig) -> Self {
        let defaults = ZoomConfig::default();
        let (mut min_zoom, mut max_zoom) = (limits.min.min(limits.max), limits.min.max(limits.max));
        if !(min_zoom.is_finite() && max_zoom.is_finite() && min_zoom > 0.0) {
            (min_zoom, max_zoom) = (defaults.min, defaults.max);
        }
        let step = if limits.step.is_finite() && limits.step > 0.0 {
            limits.step
        } else {
            defaults.step
        };

        Self {
            zoom: 1.0_f32.clamp(min_zoom, max_zoom),
            offset: Vec2::ZERO,
            min_zoom,
            max_zoom,
            step,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom, clamped to the configured range
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    pub fn zoom_by(&mut self, delta: f32) {
        self.set_zoom(self.zoom + delta);
    }

    /// Apply one wheel event. Negative `delta_y` (scrolling up) zooms in,
    /// positive zooms out, zero is ignored.
    pub fn apply_wheel(&mut self, delta_y: f32) -> bool {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return false;
        }
        let before = self.zoom;
        if delta_y < 0.0 {
            self.zoom_by(self.step);
        } else {
            self.zoom_by(-self.step);
        }
        self.zoom != before
    }
}

impl Default for RenderTransform {
    fn default() -> Self {
        Self::new(&ZoomConfig::default())
    }
}

/// Sizing of the drawing surface for the current viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    /// Size in logical drawing units
    pub logical_size: Vec2,

    /// On-screen scale applied when the viewport is narrower than the canvas
    pub display_scale: f32,

    /// Device pixels per logical point
    pub pixels_per_point: f32,
}

impl SurfaceGeometry {
    /// Fit a logical canvas into a viewport. The canvas is never scaled up
    /// and a missing pixel ratio is treated as 1.
    pub fn fit(logical_size: Vec2, viewport_width: f32, pixels_per_point: f32) -> Self {
        let pixels_per_point = if pixels_per_point.is_finite() && pixels_per_point > 0.0 {
            pixels_per_point
        } else {
            1.0
        };

        let max_width = viewport_width * MAX_VIEWPORT_FRACTION;
        let display_scale = if max_width.is_finite() && max_width > 0.0 && logical_size.x > 0.0 {
            (max_width / logical_size.x).min(1.0)
        } else {
            1.0
        };

        Self {
            logical_size,
            display_scale,
            pixels_per_point,
        }
    }

    /// On-screen size in points
    pub fn display_size(&self) -> Vec2 {
        self.logical_size * self.display_scale
    }

    /// Backing store size in device pixels
    pub fn physical_size(&self) -> [u32; 2] {
        let size = self.display_size() * self.pixels_per_point;
        [size.x.round().max(0.0) as u32, size.y.round().max(0.0) as u32]
    }

    /// Scale from logical units to device pixels
    pub fn device_scale(&self) -> f32 {
        self.display_scale * self.pixels_per_point
    }
}
