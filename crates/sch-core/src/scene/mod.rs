//! Scene model - the static, ordered list of everything the schematic draws
//!
//! Draw order is the declaration order: wires, then gates, then labels, each
//! in the order they appear in their list.

mod reference;

use std::fmt;
use std::path::Path;
use egui::{Color32, Pos2, pos2};
use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::stage::{Reveal, Stage};
use crate::Result;

/// A position in `[-1, 1]` on each axis of the chip interior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct NormPoint {
    pub x: f32,
    pub y: f32,
}

impl NormPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f32; 2]> for NormPoint {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<NormPoint> for [f32; 2] {
    fn from(p: NormPoint) -> Self {
        [p.x, p.y]
    }
}

impl From<NormPoint> for Pos2 {
    fn from(p: NormPoint) -> Self {
        pos2(p.x, p.y)
    }
}

/// Display colors used by the schematic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    /// #10b981
    Emerald,
    /// #38bdf8
    Sky,
}

impl ColorToken {
    pub fn color32(self) -> Color32 {
        match self {
            ColorToken::Emerald => Color32::from_rgb(16, 185, 129),
            ColorToken::Sky => Color32::from_rgb(56, 189, 248),
        }
    }
}

/// Circuit symbol drawn for a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateVariant {
    AndLike,
    NotLike,
    IcBlock,
}

impl GateVariant {
    /// Stroke color of the symbol
    pub fn color(self) -> ColorToken {
        match self {
            GateVariant::AndLike | GateVariant::IcBlock => ColorToken::Emerald,
            GateVariant::NotLike => ColorToken::Sky,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub variant: GateVariant,
    pub position: NormPoint,
    pub min_stage: Stage,
}

impl Gate {
    pub const fn new(variant: GateVariant, x: f32, y: f32, min_stage: Stage) -> Self {
        Self {
            variant,
            position: NormPoint::new(x, y),
            min_stage,
        }
    }

    pub fn is_drawable(&self) -> bool {
        self.position.is_finite()
    }
}

/// Polyline between schematic points, drawn as connected segments in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub points: Vec<NormPoint>,
    pub color: ColorToken,
    pub min_stage: Stage,
}

impl Wire {
    pub fn new(min_stage: Stage, color: ColorToken, points: &[[f32; 2]]) -> Self {
        Self {
            points: points.iter().copied().map(NormPoint::from).collect(),
            color,
            min_stage,
        }
    }

    /// A wire needs at least two finite points
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2 && self.points.iter().all(NormPoint::is_finite)
    }
}

/// Rounded text annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelBox {
    pub text: String,
    pub position: NormPoint,
    pub color: ColorToken,
    pub min_stage: Stage,
}

impl LabelBox {
    pub fn new(text: impl Into<String>, x: f32, y: f32, color: ColorToken, min_stage: Stage) -> Self {
        Self {
            text: text.into(),
            position: NormPoint::new(x, y),
            color,
            min_stage,
        }
    }

    pub fn is_drawable(&self) -> bool {
        self.position.is_finite()
    }
}

impl Reveal for Gate {
    fn min_stage(&self) -> Stage {
        self.min_stage
    }
}

impl Reveal for Wire {
    fn min_stage(&self) -> Stage {
        self.min_stage
    }
}

impl Reveal for LabelBox {
    fn min_stage(&self) -> Stage {
        self.min_stage
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Wire,
    Gate,
    Label,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Wire => write!(f, "wire"),
            EntityKind::Gate => write!(f, "gate"),
            EntityKind::Label => write!(f, "label"),
        }
    }
}

/// A scene entry the renderer will skip
#[derive(Debug, Clone, PartialEq)]
pub struct SceneIssue {
    pub kind: EntityKind,
    pub index: usize,
    pub reason: String,
}

/// Number of entities of each kind visible at a stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibleCounts {
    pub wires: usize,
    pub gates: usize,
    pub labels: usize,
}

impl VisibleCounts {
    pub fn total(&self) -> usize {
        self.wires + self.gates + self.labels
    }
}

/// The complete, fully revealed schematic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub wires: Vec<Wire>,
    pub gates: Vec<Gate>,
    pub labels: Vec<LabelBox>,
}

impl Scene {
    /// The reference chip layout
    pub fn reference() -> Self {
        Self {
            wires: reference::wires(),
            gates: reference::gates(),
            labels: reference::labels(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scene from a bundled JSON asset
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let scene = Self::from_json_str(&contents)?;
        info!(
            "Loaded scene from {} ({} wires, {} gates, {} labels)",
            path.display(),
            scene.wires.len(),
            scene.gates.len(),
            scene.labels.len()
        );
        Ok(scene)
    }

    /// Entries that will be skipped when drawing. Never fails; the rest of
    /// the scene stays drawable.
    pub fn validate(&self) -> Vec<SceneIssue> {
        let mut issues = Vec::new();

        for (index, wire) in self.wires.iter().enumerate() {
            if wire.points.len() < 2 {
                issues.push(SceneIssue {
                    kind: EntityKind::Wire,
                    index,
                    reason: format!("{} point(s), at least 2 required", wire.points.len()),
                });
            } else if !wire.is_drawable() {
                issues.push(SceneIssue {
                    kind: EntityKind::Wire,
                    index,
                    reason: "non-finite coordinate".to_string(),
                });
            }
        }

        for (index, gate) in self.gates.iter().enumerate() {
            if !gate.is_drawable() {
                issues.push(SceneIssue {
                    kind: EntityKind::Gate,
                    index,
                    reason: "non-finite coordinate".to_string(),
                });
            }
        }

        for (index, label) in self.labels.iter().enumerate() {
            if !label.is_drawable() {
                issues.push(SceneIssue {
                    kind: EntityKind::Label,
                    index,
                    reason: "non-finite coordinate".to_string(),
                });
            }
        }

        for issue in &issues {
            warn!("Scene {} #{} will be skipped: {}", issue.kind, issue.index, issue.reason);
        }

        issues
    }

    pub fn visible_counts(&self, stage: Stage) -> VisibleCounts {
        VisibleCounts {
            wires: self.wires.iter().filter(|w| w.visible_at(stage)).count(),
            gates: self.gates.iter().filter(|g| g.visible_at(stage)).count(),
            labels: self.labels.iter().filter(|l| l.visible_at(stage)).count(),
        }
    }

    /// Highest reveal threshold in the scene
    pub fn max_stage(&self) -> Stage {
        self.wires.iter().map(|w| w.min_stage)
            .chain(self.gates.iter().map(|g| g.min_stage))
            .chain(self.labels.iter().map(|l| l.min_stage))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::FINAL_STAGE;

    #[test]
    fn test_reference_scene_shape() {
        let scene = Scene::reference();
        assert_eq!(scene.gates.len(), 18);
        assert_eq!(scene.labels.len(), 7);
        assert_eq!(scene.wires.len(), 26);
        assert!(scene.validate().is_empty());
        assert_eq!(scene.max_stage(), FINAL_STAGE);
    }

    #[test]
    fn test_reference_thresholds_in_range() {
        let scene = Scene::reference();
        let thresholds = scene.wires.iter().map(|w| w.min_stage)
            .chain(scene.gates.iter().map(|g| g.min_stage))
            .chain(scene.labels.iter().map(|l| l.min_stage));
        for t in thresholds {
            assert!((1..=FINAL_STAGE).contains(&t), "threshold {} out of range", t);
        }
    }

    #[test]
    fn test_visible_counts() {
        let scene = Scene::reference();
        assert_eq!(scene.visible_counts(0).total(), 0);
        assert_eq!(scene.visible_counts(1), VisibleCounts { wires: 1, gates: 1, labels: 1 });
        let all = scene.visible_counts(FINAL_STAGE);
        assert_eq!(all, VisibleCounts { wires: 26, gates: 18, labels: 7 });
        assert_eq!(scene.visible_counts(FINAL_STAGE + 5), all);
    }

    #[test]
    fn test_validate_flags_malformed_entries() {
        let mut scene = Scene::reference();
        scene.wires.push(Wire::new(1, ColorToken::Sky, &[[0.0, 0.0]]));
        scene.gates.push(Gate::new(GateVariant::IcBlock, f32::NAN, 0.0, 1));

        let issues = scene.validate();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].kind, EntityKind::Wire);
        assert_eq!(issues[0].index, 26);
        assert_eq!(issues[1].kind, EntityKind::Gate);
    }

    #[test]
    fn test_scene_json_asset() {
        let json = r#"{
            "wires": [ { "points": [[-1.0, 0.0], [1.0, 0.0]], "color": "sky", "min_stage": 2 } ],
            "gates": [ { "variant": "ic_block", "position": [0.0, 0.0], "min_stage": 1 } ]
        }"#;
        let scene = Scene::from_json_str(json).unwrap();
        assert_eq!(scene.wires[0].points[1], NormPoint::new(1.0, 0.0));
        assert_eq!(scene.gates[0].variant, GateVariant::IcBlock);
        assert!(scene.labels.is_empty());
    }

    #[test]
    fn test_gate_colors() {
        assert_eq!(GateVariant::AndLike.color(), ColorToken::Emerald);
        assert_eq!(GateVariant::NotLike.color(), ColorToken::Sky);
        assert_eq!(GateVariant::IcBlock.color(), ColorToken::Emerald);
        assert_eq!(ColorToken::Sky.color32(), Color32::from_rgb(0x38, 0xbd, 0xf8));
    }
}
