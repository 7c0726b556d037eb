use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::JobListing;
use crate::state::{AppState, Dashboard};

// ---------------------------------------------------------------------------
// Card labels
// ---------------------------------------------------------------------------

pub fn date_label(job: &JobListing) -> String {
    job.published_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

/// Hourly average first, then budget, then a placeholder.
pub fn rate_label(job: &JobListing) -> String {
    match (job.hourly_avg, job.budget) {
        (Some(avg), _) => format!("${avg:.2}/hr"),
        (None, Some(budget)) => format!("${} budget", format_amount(budget)),
        (None, None) => "rate unavailable".to_string(),
    }
}

fn format_amount(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

/// Search link for a listing. The title is percent-encoded into a query
/// parameter; it is not assumed to name a real job page.
pub fn search_link(base: &str, title: &str) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}q={}", urlencoding::encode(title.trim()))
}

// ---------------------------------------------------------------------------
// Card list (central panel)
// ---------------------------------------------------------------------------

pub fn job_cards(ui: &mut Ui, state: &AppState) {
    let Some(dash) = &state.dashboard else {
        return;
    };

    let heading = if state.filters_applied {
        "Filtered Jobs"
    } else {
        "All Available Jobs"
    };
    ui.heading(heading);

    let total = state.visible_indices.len();
    ui.label(format!("Showing {total} jobs based on filters:"));
    ui.separator();

    if total == 0 {
        ui.label(RichText::new("No jobs found. Try adjusting filters.").color(Color32::YELLOW));
        return;
    }

    let shown = state.displayed();
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for job in &shown {
                job_card(ui, job, dash, &state.config.link_base);
            }
            if total > shown.len() {
                ui.weak(format!("First {} of {total} jobs shown.", shown.len()));
            }
        });
}

fn job_card(ui: &mut Ui, job: &JobListing, dash: &Dashboard, link_base: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui: &mut Ui| {
            ui.vertical(|ui: &mut Ui| {
                ui.label(RichText::new(&job.title).strong().size(16.0));
                ui.horizontal(|ui: &mut Ui| {
                    let color = dash.country_colors.color_for(&job.country);
                    ui.label(RichText::new(&job.country).color(color));
                    ui.label("|");
                    ui.label(date_label(job));
                });
                ui.label(RichText::new(rate_label(job)).color(Color32::from_rgb(0x32, 0x9f, 0xc9)));
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
                ui.hyperlink_to("Apply", search_link(link_base, &job.title));
            });
        });
    });
    ui.add_space(4.0);
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn job(avg: Option<f64>, budget: Option<f64>) -> JobListing {
        JobListing::new(Some("Job".into()), None, None, avg, avg, budget)
    }

    #[test]
    fn rate_prefers_hourly_average() {
        assert_eq!(rate_label(&job(Some(15.0), Some(300.0))), "$15.00/hr");
        assert_eq!(rate_label(&job(Some(12.345), None)), "$12.35/hr");
    }

    #[test]
    fn rate_falls_back_to_budget_then_placeholder() {
        assert_eq!(rate_label(&job(None, Some(500.0))), "$500 budget");
        assert_eq!(rate_label(&job(None, Some(99.5))), "$99.50 budget");
        assert_eq!(rate_label(&job(None, None)), "rate unavailable");
    }

    #[test]
    fn date_has_placeholder() {
        assert_eq!(date_label(&job(None, None)), "unknown date");
        let dated = JobListing::new(
            None,
            None,
            NaiveDate::from_ymd_opt(2024, 2, 7).and_then(|d| d.and_hms_opt(13, 5, 0)),
            None,
            None,
            None,
        );
        assert_eq!(date_label(&dated), "2024-02-07");
    }

    #[test]
    fn link_encodes_title() {
        assert_eq!(
            search_link("https://example.com/jobs/", " C++ & Rust dev/lead? "),
            "https://example.com/jobs/?q=C%2B%2B%20%26%20Rust%20dev%2Flead%3F"
        );
        assert_eq!(
            search_link("https://example.com/search?sort=recency", "Go"),
            "https://example.com/search?sort=recency&q=Go"
        );
    }
}
