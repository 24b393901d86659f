//! Schematic view - binds the renderer to a host's frame loop
//!
//! The view redraws on every delivered frame whether or not the stage
//! changed, because zoom can change independently of it. Recreating the view
//! is the only way to reset zoom; nothing carries over between instances.

use std::sync::Arc;
use egui::{Event, Response, Sense, Ui};
use sch_core::{RenderTransform, Stage, SurfaceGeometry, ZoomConfig};
use sch_render::{FrameStats, PainterSurface, SchematicRenderer, Surface};
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::scheduler::{FrameRequest, FrameScheduler};

/// Host binding state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostState {
    /// No surface; no frames are requested or drawn
    Detached,

    /// Surface available and the frame loop running
    Attached {
        geometry: Option<SurfaceGeometry>,
        pending: Option<FrameRequest>,
    },
}

pub struct SchematicView {
    instance_id: Uuid,
    renderer: Arc<SchematicRenderer>,
    transform: RenderTransform,
    state: HostState,
    last_stats: Option<FrameStats>,
    frames_drawn: u64,
}

impl SchematicView {
    pub fn new(renderer: Arc<SchematicRenderer>, zoom: &ZoomConfig) -> Self {
        let instance_id = Uuid::new_v4();
        info!(%instance_id, "Mounted schematic view");

        Self {
            instance_id,
            renderer,
            transform: RenderTransform::new(zoom),
            state: HostState::Detached,
            last_stats: None,
            frames_drawn: 0,
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn zoom(&self) -> f32 {
        self.transform.zoom()
    }

    pub fn transform(&self) -> &RenderTransform {
        &self.transform
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.state, HostState::Attached { .. })
    }

    pub fn pending_request(&self) -> Option<FrameRequest> {
        match self.state {
            HostState::Attached { pending, .. } => pending,
            HostState::Detached => None,
        }
    }

    pub fn geometry(&self) -> Option<SurfaceGeometry> {
        match self.state {
            HostState::Attached { geometry, .. } => geometry,
            HostState::Detached => None,
        }
    }

    /// Stats of the most recent frame drawn by this instance
    pub fn last_stats(&self) -> Option<FrameStats> {
        self.last_stats
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Start the frame loop
    pub fn attach(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.is_attached() {
            return;
        }

        self.state = HostState::Attached {
            geometry: None,
            pending: Some(scheduler.request_frame()),
        };
        info!(instance_id = %self.instance_id, "Schematic view attached");
    }

    /// Stop the frame loop, cancelling any outstanding request
    pub fn detach(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let HostState::Attached { pending, .. } = self.state {
            if let Some(request) = pending {
                scheduler.cancel_frame(request);
            }
            self.state = HostState::Detached;
            info!(instance_id = %self.instance_id, "Schematic view detached");
        }
    }

    /// Re-derive the surface size for a new viewport width / pixel ratio
    /// and reconfigure the surface if it changed. Ignored while detached.
    pub fn resize(
        &mut self,
        surface: &mut dyn Surface,
        viewport_width: f32,
        pixels_per_point: f32,
    ) -> Option<SurfaceGeometry> {
        let geometry = SurfaceGeometry::fit(
            self.renderer.chip().surface_size(),
            viewport_width,
            pixels_per_point,
        );

        if !self.is_attached() {
            return None;
        }
        if self.update_geometry(geometry) {
            surface.configure(&geometry);
        }
        Some(geometry)
    }

    fn update_geometry(&mut self, new_geometry: SurfaceGeometry) -> bool {
        let HostState::Attached { geometry, .. } = &mut self.state else {
            return false;
        };
        if *geometry == Some(new_geometry) {
            return false;
        }

        *geometry = Some(new_geometry);
        let [w, h] = new_geometry.physical_size();
        debug!(
            width = w,
            height = h,
            pixels_per_point = new_geometry.pixels_per_point,
            "Resized schematic surface"
        );
        true
    }

    /// One wheel event. `delta_y < 0` zooms in.
    pub fn on_wheel(&mut self, delta_y: f32) -> bool {
        let changed = self.transform.apply_wheel(delta_y);
        if changed {
            debug!(zoom = self.transform.zoom(), "Zoom changed");
        }
        changed
    }

    /// Apply every wheel event of one egui frame, one zoom step each.
    /// Returns how many changed the zoom.
    pub fn on_scroll_events(&mut self, events: &[Event]) -> usize {
        events
            .iter()
            .filter_map(|event| match event {
                // egui reports wheel-up as a positive delta
                Event::Scroll(delta) => Some(-delta.y),
                _ => None,
            })
            .filter(|delta_y| self.on_wheel(*delta_y))
            .count()
    }

    /// Handle a delivered frame: draw, then ask for the next one. Frames
    /// that arrive while detached or after being superseded are dropped.
    pub fn on_frame(
        &mut self,
        request: FrameRequest,
        surface: &mut dyn Surface,
        stage: Stage,
        scheduler: &mut dyn FrameScheduler,
    ) -> Option<FrameStats> {
        match self.state {
            HostState::Detached => {
                trace!(id = request.id(), "Frame delivered while detached");
                return None;
            }
            HostState::Attached { pending, .. } if pending != Some(request) => {
                trace!(id = request.id(), "Stale frame request");
                return None;
            }
            HostState::Attached { .. } => {}
        }

        let stats = self.renderer.draw_frame(surface, stage, &self.transform);
        if stats.is_some() {
            self.frames_drawn += 1;
            self.last_stats = stats;
        }

        if let HostState::Attached { pending, .. } = &mut self.state {
            *pending = Some(scheduler.request_frame());
        }
        stats
    }

    /// Show the schematic in an egui layout
    pub fn ui(&mut self, ui: &mut Ui, stage: Stage, scheduler: &mut dyn FrameScheduler) -> Response {
        self.attach(scheduler);

        let ctx = ui.ctx().clone();
        let geometry = SurfaceGeometry::fit(
            self.renderer.chip().surface_size(),
            ctx.screen_rect().width(),
            ctx.pixels_per_point(),
        );
        self.update_geometry(geometry);

        let (rect, response) = ui.allocate_exact_size(geometry.display_size(), Sense::hover());

        if response.hovered() {
            let events = ui.input(|i| i.events.clone());
            self.on_scroll_events(&events);
        }

        let painter = ui.painter_at(rect);
        let mut surface = PainterSurface::new(&painter, rect.min);
        surface.configure(&geometry);

        if let Some(request) = self.pending_request() {
            self.on_frame(request, &mut surface, stage, scheduler);
        }

        response
    }
}
