use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;
use crate::ui::{cards, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyGigsApp {
    pub state: AppState,
}

impl RustyGigsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for RustyGigsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Startup load failed: error only, no dashboard ----
        if let Some(err) = &self.state.fatal_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading(RichText::new(format!("Could not load dataset: {err}")).color(Color32::RED));
                });
            });
            return;
        }

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: trend charts ----
        egui::TopBottomPanel::bottom("trend_panel")
            .resizable(true)
            .default_height(300.0)
            .show(ctx, |ui| {
                plot::trend_charts(ui, &self.state);
            });

        // ---- Central panel: job cards ----
        egui::CentralPanel::default().show(ctx, |ui| {
            cards::job_cards(ui, &self.state);
        });
    }
}
