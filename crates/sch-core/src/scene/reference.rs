//! Reference chip layout

use super::{ColorToken, Gate, GateVariant, LabelBox, Wire};
use ColorToken::{Emerald, Sky};
use GateVariant::{AndLike, NotLike};

pub(super) fn gates() -> Vec<Gate> {
    vec![
        Gate::new(AndLike, -0.45, -0.45, 1),  // G1
        Gate::new(NotLike, -0.15, -0.45, 3),  // G2
        Gate::new(AndLike, 0.20, -0.20, 5),   // G3
        Gate::new(AndLike, -0.35, 0.10, 4),   // G4
        Gate::new(NotLike, 0.00, 0.25, 6),    // G5
        Gate::new(NotLike, 0.35, 0.05, 7),    // G6
        Gate::new(AndLike, 0.55, 0.40, 8),    // G7
        Gate::new(NotLike, 0.20, 0.55, 9),    // G8
        Gate::new(AndLike, -0.15, 0.40, 10),  // G9
        // top-mid cluster
        Gate::new(AndLike, 0.09, -0.70, 8),
        Gate::new(NotLike, 0.62, -0.70, 9),
        Gate::new(AndLike, -0.15, -0.70, 10),
        // lower-left cluster
        Gate::new(NotLike, -0.55, 0.55, 9),
        Gate::new(AndLike, -0.45, 0.30, 10),
        Gate::new(NotLike, -0.31, -0.75, 10),
        Gate::new(NotLike, -0.60, -0.87, 9),
        Gate::new(AndLike, -0.55, -0.17, 9),
        Gate::new(NotLike, 0.15, 0.90, 9),
    ]
}

pub(super) fn labels() -> Vec<LabelBox> {
    vec![
        LabelBox::new("IN1", -0.97, -0.45, Sky, 1),
        LabelBox::new("IN2", -0.97, 0.10, Emerald, 3),
        LabelBox::new("OUT1", 0.79, -0.20, Sky, 7),
        LabelBox::new("OUT2 LED", 0.83, 0.25, Emerald, 9),
        LabelBox::new("OUT3", 0.79, 0.55, Sky, 10),
        LabelBox::new("VDD", 0.79, -0.70, Sky, 10),
        LabelBox::new("VSS", -0.55, 0.87, Emerald, 10),
    ]
}

pub(super) fn wires() -> Vec<Wire> {
    vec![
        // IN1 -> G1
        Wire::new(1, Sky, &[[-0.9, -0.45], [-0.45, -0.45]]),
        // G1 -> G2
        Wire::new(2, Emerald, &[[-0.38, -0.45], [-0.15, -0.45]]),
        // IN2 -> G4
        Wire::new(3, Emerald, &[[-0.9, 0.10], [-0.35, 0.10]]),
        // G4 -> G5
        Wire::new(4, Emerald, &[[-0.26, 0.10], [-0.26, 0.25], [0.0, 0.25]]),
        // G2 -> G3
        Wire::new(5, Sky, &[[-0.05, -0.45], [-0.05, -0.20], [0.20, -0.20]]),
        // G5 -> G3
        Wire::new(6, Emerald, &[[0.10, 0.25], [0.10, -0.20], [0.20, -0.20]]),
        // G3 -> G6 -> OUT1
        Wire::new(7, Sky, &[[0.29, -0.20], [0.29, 0.05]]),
        Wire::new(7, Sky, &[[0.44, 0.05], [0.55, -0.20], [0.70, -0.20]]),
        // G6 -> G7
        Wire::new(8, Sky, &[[0.29, 0.05], [0.29, 0.40], [0.55, 0.40]]),
        // G7 -> G8
        Wire::new(9, Emerald, &[[0.55, 0.40], [0.55, 0.55], [0.20, 0.55]]),
        // G9 -> G8
        Wire::new(10, Sky, &[[-0.15, 0.40], [-0.15, 0.55], [0.20, 0.55]]),
        // G8 -> OUT3
        Wire::new(10, Sky, &[[0.20, 0.55], [0.70, 0.55]]),
        // OUT2 LED
        Wire::new(9, Emerald, &[[0.10, 0.25], [0.55, 0.25], [0.70, 0.25]]),
        // top-mid cluster
        Wire::new(8, Sky, &[[-0.05, -0.45], [-0.05, -0.70], [0.05, -0.70]]),
        Wire::new(9, Emerald, &[[0.18, -0.70], [0.60, -0.70], [0.63, -0.70]]),
        Wire::new(10, Sky, &[[0.09, -0.70], [-0.05, -0.70]]),
        // lower-left cluster
        Wire::new(9, Emerald, &[[-0.9, 0.10], [-0.75, 0.10], [-0.75, 0.55], [-0.55, 0.55], [-0.55, 0.82]]),
        Wire::new(10, Sky, &[[-0.45, 0.55], [-0.45, 0.31]]),
        Wire::new(10, Emerald, &[[-0.37, 0.30], [-0.37, 0.41], [-0.15, 0.41]]),
        Wire::new(10, Sky, &[[-0.37, -0.75], [-0.37, -0.45]]),
        Wire::new(10, Sky, &[[-0.24, -0.75], [-0.20, -0.75]]),
        Wire::new(9, Emerald, &[[-0.15, 0.55], [-0.15, 0.90], [0.15, 0.90]]),
        Wire::new(9, Emerald, &[[0.24, 0.90], [0.45, 0.90], [0.45, 0.55]]),
        Wire::new(3, Emerald, &[[-0.75, -0.45], [-0.75, -0.17], [-0.54, -0.17]]),
        Wire::new(5, Emerald, &[[-0.75, -0.45], [-0.75, -0.87], [-0.65, -0.87]]),
        Wire::new(3, Emerald, &[[-0.55, -0.87], [-0.37, -0.87], [-0.37, -0.76]]),
    ]
}
