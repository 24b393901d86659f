//! Reveal stages and the progress controller that drives them

use std::sync::Arc;
use parking_lot::RwLock;
use tracing::debug;

use crate::{Result, SchematicError};

/// Reveal progress counter. Any value is accepted; negative stages reveal
/// nothing with a positive threshold and stages past the end reveal everything.
pub type Stage = i32;

/// Last reveal step of the reference schematic
pub const FINAL_STAGE: Stage = 10;

/// Visibility predicate shared by every drawable entity
#[inline]
pub fn is_visible(min_stage: Stage, stage: Stage) -> bool {
    stage >= min_stage
}

/// Anything that appears once a reveal threshold is reached
pub trait Reveal {
    /// Minimum stage at which the entity is drawn
    fn min_stage(&self) -> Stage;

    /// Whether the entity is drawn at `stage`
    fn visible_at(&self, stage: Stage) -> bool {
        is_visible(self.min_stage(), stage)
    }
}

#[derive(Debug, Clone)]
struct ProgressState {
    stage: Stage,
    final_stage: Stage,
}

/// Shared reveal progress, owned by the host and read by the views.
///
/// Cloning yields another handle onto the same counter.
#[derive(Debug, Clone)]
pub struct StageProgress {
    state: Arc<RwLock<ProgressState>>,
}

impl StageProgress {
    /// Create a progress counter starting at stage 0
    pub fn new(final_stage: Stage) -> Self {
        Self {
            state: Arc::new(RwLock::new(ProgressState {
                stage: 0,
                final_stage: final_stage.max(1),
            })),
        }
    }

    pub fn current(&self) -> Stage {
        self.state.read().stage
    }

    pub fn final_stage(&self) -> Stage {
        self.state.read().final_stage
    }

    pub fn is_complete(&self) -> bool {
        let state = self.state.read();
        state.stage >= state.final_stage
    }

    /// Percentage of the schematic revealed, rounded to the nearest integer
    pub fn progress_percent(&self) -> u8 {
        let state = self.state.read();
        let pct = (state.stage as f64 / state.final_stage as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }

    /// Reveal the next chunk of the schematic
    pub fn advance(&self) -> Result<Stage> {
        let mut state = self.state.write();

        if state.stage >= state.final_stage {
            return Err(SchematicError::RevealComplete(state.stage));
        }

        state.stage = (state.stage + 1).min(state.final_stage);
        debug!(stage = state.stage, "Advanced reveal stage");
        Ok(state.stage)
    }

    /// Go back to a blank canvas
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.stage = 0;
        debug!("Reset reveal stage");
    }
}

impl Default for StageProgress {
    fn default() -> Self {
        Self::new(FINAL_STAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Threshold(Stage);

    impl Reveal for Threshold {
        fn min_stage(&self) -> Stage {
            self.0
        }
    }

    #[test]
    fn test_visibility_is_monotonic() {
        for min_stage in -2..=12 {
            let entity = Threshold(min_stage);
            for s1 in -3..=13 {
                for s2 in (s1 + 1)..=14 {
                    if entity.visible_at(s1) {
                        assert!(entity.visible_at(s2), "min {} visible at {} but not {}", min_stage, s1, s2);
                    }
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_stages() {
        assert!(!Threshold(1).visible_at(-5));
        assert!(Threshold(0).visible_at(0));
        assert!(Threshold(-1).visible_at(-1));
        assert!(Threshold(FINAL_STAGE).visible_at(FINAL_STAGE + 100));
    }

    #[test]
    fn test_advance_saturates_at_final_stage() {
        let progress = StageProgress::default();
        for expected in 1..=FINAL_STAGE {
            assert_eq!(progress.advance().unwrap(), expected);
        }
        assert!(progress.is_complete());
        assert!(matches!(progress.advance(), Err(SchematicError::RevealComplete(10))));
        assert_eq!(progress.current(), FINAL_STAGE);
    }

    #[test]
    fn test_progress_percent() {
        let progress = StageProgress::new(3);
        assert_eq!(progress.progress_percent(), 0);
        progress.advance().unwrap();
        assert_eq!(progress.progress_percent(), 33);
        progress.advance().unwrap();
        assert_eq!(progress.progress_percent(), 67);
        progress.advance().unwrap();
        assert_eq!(progress.progress_percent(), 100);
    }

    #[test]
    fn test_shared_handle_and_reset() {
        let progress = StageProgress::default();
        let panel_handle = progress.clone();
        panel_handle.advance().unwrap();
        panel_handle.advance().unwrap();
        assert_eq!(progress.current(), 2);

        progress.reset();
        assert_eq!(panel_handle.current(), 0);
        assert!(!panel_handle.is_complete());
    }
}
