use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::{JobType, ALL_COUNTRIES};
use crate::state::{AppState, MAX_RATE_FILTER};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Nothing is filtered until "Show Jobs".
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Job Filters");
    ui.separator();

    let countries = match &state.dashboard {
        Some(dash) => dash.countries.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let controls = &mut state.controls;

            ui.strong("Country");
            egui::ComboBox::from_id_salt("country")
                .selected_text(&controls.country)
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut controls.country, ALL_COUNTRIES.to_string(), ALL_COUNTRIES);
                    for country in &countries {
                        ui.selectable_value(&mut controls.country, country.clone(), country);
                    }
                });
            ui.add_space(6.0);

            ui.strong("Job Type");
            egui::ComboBox::from_id_salt("job_type")
                .selected_text(controls.job_type.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for jt in JobType::VARIANTS {
                        ui.selectable_value(&mut controls.job_type, jt, jt.label());
                    }
                });
            ui.add_space(6.0);

            ui.strong("Min Hourly Rate ($)");
            ui.add(egui::Slider::new(&mut controls.min_rate, 0..=MAX_RATE_FILTER));
            ui.add_space(6.0);

            ui.checkbox(&mut controls.remote_only, "Remote jobs only");
            ui.add_space(6.0);

            ui.checkbox(&mut controls.use_date_range, "Published date range");
            ui.add_enabled_ui(controls.use_date_range, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("From");
                    ui.add(DatePickerButton::new(&mut controls.date_start).id_salt("date_start"));
                });
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("To");
                    ui.add(DatePickerButton::new(&mut controls.date_end).id_salt("date_end"));
                });
            });
            ui.add_space(6.0);

            ui.strong("Keyword");
            ui.text_edit_singleline(&mut controls.keyword);
            ui.add_space(10.0);

            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Show Jobs").clicked() {
                    state.apply_filters();
                }
                if ui.button("Reset").clicked() {
                    state.reset_filters();
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(dash) = &state.dashboard {
            ui.label(format!(
                "{} listings loaded, {} matching",
                dash.table.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open job listings")
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(table) => state.set_dataset(table),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
