//! Core functionality for the staged schematic reveal
//!
//! This crate provides the scene model, the stage/visibility rules, the
//! chip coordinate mapper and the configuration shared by the renderer and
//! the host views.

pub mod config;
pub mod geometry;
pub mod scene;
pub mod stage;

use thiserror::Error;

// Re-export commonly used types
pub use config::{SchematicConfig, CanvasConfig, ZoomConfig, StyleConfig};
pub use geometry::{ChipGeometry, RenderTransform, SurfaceGeometry};
pub use scene::{Scene, Gate, GateVariant, Wire, LabelBox, NormPoint, ColorToken, SceneIssue, EntityKind, VisibleCounts};
pub use stage::{Stage, FINAL_STAGE, Reveal, StageProgress, is_visible};

/// Errors that can occur while loading or driving a schematic
#[derive(Error, Debug)]
pub enum SchematicError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Schematic already fully revealed at stage {0}")]
    RevealComplete(Stage),
}

pub type Result<T> = std::result::Result<T, SchematicError>;
