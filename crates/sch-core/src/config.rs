//! Schematic configuration
//!
//! Every field has a default matching the reference look, so a partial
//! JSON file only needs to name what it overrides.

use std::path::Path;
use serde::{Serialize, Deserialize};
use tracing::info;

use crate::geometry::ChipGeometry;
use crate::stage::{Stage, FINAL_STAGE};
use crate::{Result, SchematicError};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchematicConfig {
    /// Chip / canvas geometry
    pub canvas: CanvasConfig,

    /// Zoom limits
    pub zoom: ZoomConfig,

    /// Stroke widths and glyph metrics
    pub style: StyleConfig,

    /// Stage at which the schematic is complete
    pub final_stage: Stage,
}

impl Default for SchematicConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            zoom: ZoomConfig::default(),
            style: StyleConfig::default(),
            final_stage: FINAL_STAGE,
        }
    }
}

/// Logical canvas size; the chip fills the whole canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    /// Interior padding as a fraction of the chip size, per side
    pub padding_ratio: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            corner_radius: 16.0,
            padding_ratio: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: f32,
    pub max: f32,
    /// Change per wheel event
    pub step: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 3.0,
            step: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub wire_width: f32,
    pub gate_line_width: f32,
    pub gate_scale: f32,
    pub chip_outline_width: f32,
    pub label_font_size: f32,
    pub label_pad_x: f32,
    pub label_height: f32,
    pub label_radius: f32,
    pub label_line_width: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            wire_width: 4.0,
            gate_line_width: 2.0,
            gate_scale: 1.8,
            chip_outline_width: 2.0,
            label_font_size: 11.0,
            label_pad_x: 12.0,
            label_height: 20.0,
            label_radius: 4.0,
            label_line_width: 1.5,
        }
    }
}

impl SchematicConfig {
    /// Parse a configuration from JSON and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SchematicConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        info!("Loaded schematic config from {}", path.display());
        Ok(config)
    }

    /// Reject values the renderer cannot work with
    pub fn validate(&self) -> Result<()> {
        let canvas = &self.canvas;
        positive("canvas.width", canvas.width)?;
        positive("canvas.height", canvas.height)?;
        if !(0.0..0.5).contains(&canvas.padding_ratio) {
            return Err(SchematicError::InvalidConfig(format!(
                "padding_ratio must be in [0, 0.5), got {}",
                canvas.padding_ratio
            )));
        }
        non_negative("canvas.corner_radius", canvas.corner_radius)?;

        let zoom = &self.zoom;
        positive("zoom.min", zoom.min)?;
        positive("zoom.max", zoom.max)?;
        positive("zoom.step", zoom.step)?;
        if zoom.min > zoom.max {
            return Err(SchematicError::InvalidConfig(format!(
                "zoom range [{}, {}] is empty",
                zoom.min, zoom.max
            )));
        }

        let style = &self.style;
        positive("style.wire_width", style.wire_width)?;
        positive("style.gate_line_width", style.gate_line_width)?;
        positive("style.gate_scale", style.gate_scale)?;
        positive("style.chip_outline_width", style.chip_outline_width)?;
        positive("style.label_font_size", style.label_font_size)?;
        positive("style.label_height", style.label_height)?;
        positive("style.label_line_width", style.label_line_width)?;
        non_negative("style.label_pad_x", style.label_pad_x)?;
        non_negative("style.label_radius", style.label_radius)?;

        if self.final_stage < 1 {
            return Err(SchematicError::InvalidConfig(format!(
                "final_stage must be at least 1, got {}",
                self.final_stage
            )));
        }

        Ok(())
    }

    /// Chip geometry derived from the canvas settings
    pub fn chip_geometry(&self) -> ChipGeometry {
        ChipGeometry {
            width: self.canvas.width,
            height: self.canvas.height,
            corner_radius: self.canvas.corner_radius,
            padding_ratio: self.canvas.padding_ratio,
        }
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SchematicError::InvalidConfig(format!("{} must be positive and finite, got {}", name, value)))
    }
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SchematicError::InvalidConfig(format!("{} must be finite and not negative, got {}", name, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SchematicConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.final_stage, 10);
        assert_eq!(config.zoom.max, 3.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SchematicConfig::from_json_str(r#"{ "zoom": { "max": 2.0 }, "style": { "gate_scale": 2.5 } }"#).unwrap();
        assert_eq!(config.zoom.max, 2.0);
        assert_eq!(config.zoom.min, 0.5);
        assert_eq!(config.style.gate_scale, 2.5);
        assert_eq!(config.canvas.width, 800.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = SchematicConfig::from_json_str(r#"{ "zoom": { "min": 4.0, "max": 3.0 } }"#).unwrap_err();
        assert!(matches!(err, SchematicError::InvalidConfig(_)));

        let err = SchematicConfig::from_json_str(r#"{ "canvas": { "padding_ratio": 0.5 } }"#).unwrap_err();
        assert!(matches!(err, SchematicError::InvalidConfig(_)));

        let err = SchematicConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SchematicError::Json(_)));
    }

    #[test]
    fn test_style_and_non_finite_values_rejected() {
        for json in [
            r#"{ "style": { "label_height": 0.0 } }"#,
            r#"{ "style": { "gate_scale": -1.8 } }"#,
            r#"{ "style": { "wire_width": 0.0 } }"#,
            r#"{ "style": { "label_pad_x": -2.0 } }"#,
            r#"{ "zoom": { "step": 0.0 } }"#,
        ] {
            let err = SchematicConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, SchematicError::InvalidConfig(_)), "{} accepted", json);
        }

        // JSON has no infinity literal
        let mut config = SchematicConfig::default();
        config.canvas.width = f32::INFINITY;
        assert!(config.validate().is_err());

        let mut config = SchematicConfig::default();
        config.style.label_line_width = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SchematicConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SchematicError::Io(_)));
    }
}
