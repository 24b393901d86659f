//! Main application entry point

use std::sync::Arc;
use eframe::egui::{self, CentralPanel, RichText, SidePanel};
use anyhow::Result;
use tracing::{info, warn};

use sch_core::{Scene, SchematicConfig, StageProgress};
use sch_render::SchematicRenderer;
use sch_ui::{StepAction, StepPanel, Theme};
use sch_views::{EguiScheduler, SchematicView};

/// Optional JSON file overriding [`SchematicConfig`] defaults
const CONFIG_ENV: &str = "SCHEMATIC_CONFIG";

/// Optional JSON scene asset replacing the reference layout
const SCENE_ENV: &str = "SCHEMATIC_SCENE";

/// Main application state
struct SchematicApp {
    config: SchematicConfig,

    /// Shared by every view instance; the scene never changes at runtime
    renderer: Arc<SchematicRenderer>,

    /// Reveal progress, shared with the step panel
    progress: StageProgress,

    step_panel: StepPanel,

    /// The currently mounted schematic view
    view: SchematicView,

    scheduler: EguiScheduler,
}

impl SchematicApp {
    fn new(cc: &eframe::CreationContext<'_>, config: SchematicConfig, scene: Scene) -> Self {
        sch_ui::apply_theme(&cc.egui_ctx, &Theme::default());

        let renderer = Arc::new(SchematicRenderer::new(scene, &config));
        let progress = StageProgress::new(config.final_stage);
        let step_panel = StepPanel::new(progress.clone());
        let view = SchematicView::new(renderer.clone(), &config.zoom);

        Self {
            config,
            renderer,
            progress,
            step_panel,
            view,
            scheduler: EguiScheduler::new(cc.egui_ctx.clone()),
        }
    }

    /// Throw away the current view and mount a fresh one
    fn remount(&mut self) {
        self.view.detach(&mut self.scheduler);
        self.view = SchematicView::new(self.renderer.clone(), &self.config.zoom);
    }
}

impl eframe::App for SchematicApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut action = StepAction::None;

        SidePanel::left("step_panel")
            .resizable(false)
            .min_width(320.0)
            .show(ctx, |ui| {
                ui.add_space(16.0);
                action = self.step_panel.ui(ui);
            });

        CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                self.view.ui(ui, self.progress.current(), &mut self.scheduler);
                ui.add_space(8.0);
                ui.label(
                    RichText::new(format!("Scroll to zoom · {:.0}%", self.view.zoom() * 100.0))
                        .small()
                        .weak(),
                );
            });
        });

        match action {
            StepAction::Revealed(stage) => info!(stage, "Revealed stage"),
            StepAction::StartOver => self.remount(),
            StepAction::None => {}
        }
    }
}

fn load_config() -> SchematicConfig {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => SchematicConfig::load(&path).unwrap_or_else(|e| {
            warn!("Failed to load config from {}: {}, using defaults", path, e);
            SchematicConfig::default()
        }),
        Err(_) => SchematicConfig::default(),
    }
}

fn load_scene() -> Scene {
    let scene = match std::env::var(SCENE_ENV) {
        Ok(path) => Scene::load(&path).unwrap_or_else(|e| {
            warn!("Failed to load scene from {}: {}, using reference layout", path, e);
            Scene::reference()
        }),
        Err(_) => Scene::reference(),
    };

    // problems are logged; the affected entities are skipped at draw time
    scene.validate();
    scene
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting schematic reveal");

    let config = load_config();
    let scene = load_scene();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "Schematic Reveal",
        options,
        Box::new(move |cc| {
            Box::new(SchematicApp::new(cc, config, scene))
        }),
    ).map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
