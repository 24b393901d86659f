//! Frame request plumbing between a view and its host

use std::collections::VecDeque;
use tracing::trace;

/// Handle for one requested display frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(u64);

impl FrameRequest {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Something that can call back once per display refresh
pub trait FrameScheduler {
    /// Ask for the next frame
    fn request_frame(&mut self) -> FrameRequest;

    /// Withdraw a request that has not been delivered yet
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Schedules frames through egui's repaint loop
pub struct EguiScheduler {
    ctx: egui::Context,
    next_id: u64,
}

impl EguiScheduler {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx, next_id: 0 }
    }
}

impl FrameScheduler for EguiScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        self.ctx.request_repaint();
        FrameRequest(self.next_id)
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        // egui cannot revoke a repaint; the view ignores ids it no longer holds
        trace!(id = request.0, "Frame request cancelled");
    }
}

/// Scheduler driven by hand, for headless hosts and tests
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: VecDeque<FrameRequest>,
    cancelled: Vec<FrameRequest>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver the oldest outstanding request, as a display refresh would
    pub fn next_frame(&mut self) -> Option<FrameRequest> {
        self.pending.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn cancelled(&self) -> &[FrameRequest] {
        &self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.pending.push_back(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.pending.retain(|r| *r != request);
        self.cancelled.push(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_scheduler_delivers_in_order() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.request_frame();
        let b = scheduler.request_frame();
        assert_ne!(a, b);
        assert_eq!(scheduler.next_frame(), Some(a));
        assert_eq!(scheduler.next_frame(), Some(b));
        assert_eq!(scheduler.next_frame(), None);
    }

    #[test]
    fn test_cancelled_request_is_never_delivered() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.request_frame();
        scheduler.cancel_frame(a);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.cancelled(), &[a]);
        assert_eq!(scheduler.next_frame(), None);
    }
}
