//! User interface components for the schematic reveal
//!
//! This crate provides the egui theme and the step panel that drives the
//! reveal progress.

pub mod step_panel;
pub mod theme;

pub use step_panel::{StepPanel, StepAction};
pub use theme::{Theme, apply_theme};
