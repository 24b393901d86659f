//! Step panel - the reveal button, progress readout and start-over control

use egui::{Button, Color32, ProgressBar, RichText, Ui};
use sch_core::{SchematicError, Stage, StageProgress};
use tracing::{debug, info};

use crate::theme::{accent_color, muted_color, sky_color};

/// What the host should do after the panel was shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    None,
    /// A new stage was revealed
    Revealed(Stage),
    /// Progress was reset; the host must recreate the schematic view
    StartOver,
}

#[derive(Debug, Clone)]
struct StepPanelConfig {
    reveal_label: String,
    complete_message: String,
    button_width: f32,
}

impl Default for StepPanelConfig {
    fn default() -> Self {
        Self {
            reveal_label: "Click to draw Schematic".to_string(),
            complete_message: "Schematic complete! Great work, chip designer!".to_string(),
            button_width: 280.0,
        }
    }
}

pub struct StepPanel {
    progress: StageProgress,
    config: StepPanelConfig,
}

impl StepPanel {
    pub fn new(progress: StageProgress) -> Self {
        Self {
            progress,
            config: StepPanelConfig::default(),
        }
    }

    /// "Stage n/N"
    pub fn status_text(&self) -> String {
        format!("Stage {}/{}", self.progress.current(), self.progress.final_stage())
    }

    /// Reveal button pressed
    pub fn reveal(&self) -> StepAction {
        match self.progress.advance() {
            Ok(stage) => StepAction::Revealed(stage),
            Err(SchematicError::RevealComplete(_)) => StepAction::None,
            Err(e) => {
                debug!("Reveal ignored: {}", e);
                StepAction::None
            }
        }
    }

    /// Start-over button pressed
    pub fn start_over(&self) -> StepAction {
        self.progress.reset();
        info!("Starting the schematic over");
        StepAction::StartOver
    }

    pub fn ui(&mut self, ui: &mut Ui) -> StepAction {
        let mut action = StepAction::None;
        let complete = self.progress.is_complete();

        ui.vertical(|ui| {
            ui.heading(RichText::new("STEP 1 · DRAW SCHEMATIC").color(sky_color()));
            ui.add_space(8.0);

            let label_color = if complete { muted_color() } else { Color32::WHITE };
            let button = Button::new(RichText::new(&self.config.reveal_label).strong().color(label_color))
                .min_size(egui::vec2(self.config.button_width, 40.0));
            if ui.add_enabled(!complete, button).clicked() {
                action = self.reveal();
            }

            ui.add_space(8.0);
            ui.label(self.status_text());
            ui.add(
                ProgressBar::new(self.progress.progress_percent() as f32 / 100.0)
                    .desired_width(self.config.button_width)
                    .fill(accent_color())
                    .show_percentage(),
            );

            if complete {
                ui.add_space(12.0);
                ui.label(RichText::new(&self.config.complete_message).color(accent_color()).size(18.0));
                ui.add_space(8.0);
                if ui.button("Start over").clicked() {
                    action = self.start_over();
                }
            }
        });

        action
    }
}
