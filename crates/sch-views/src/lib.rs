//! View layer for the staged schematic
//!
//! Hosts the render loop: the [`SchematicView`] owns the zoom state and the
//! attached/detached lifecycle, and a [`FrameScheduler`] delivers frames.

mod scheduler;
mod schematic_view;

pub use scheduler::{FrameRequest, FrameScheduler, EguiScheduler, ManualScheduler};
pub use schematic_view::{SchematicView, HostState};
