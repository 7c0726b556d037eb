use eframe::egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotPoints, Points};

use crate::data::model::TrendPoint;
use crate::state::AppState;

const POSTINGS_COLOR: Color32 = Color32::from_rgb(220, 20, 60);
const RATE_COLOR: Color32 = Color32::from_rgb(0x32, 0x9f, 0xc9);

// ---------------------------------------------------------------------------
// Trend charts (bottom panel)
// ---------------------------------------------------------------------------

/// Monthly postings and mean hourly rate, side by side. Always drawn from
/// the full table.
pub fn trend_charts(ui: &mut Ui, state: &AppState) {
    let Some(dash) = &state.dashboard else {
        return;
    };

    ui.heading("Job Market Trends");
    if dash.trends.is_empty() {
        ui.label("No dated listings to chart.");
        return;
    }

    let counts: Vec<[f64; 2]> = dash
        .trends
        .iter()
        .enumerate()
        .map(|(i, p)| [i as f64, p.count as f64])
        .collect();
    // Months without any rated listing leave a gap in the series.
    let rates = rate_series(&dash.trends);

    ui.columns(2, |cols| {
        trend_plot(&mut cols[0], "postings_trend", "Monthly Job Postings", "Postings", &dash.trends, counts, POSTINGS_COLOR);
        trend_plot(&mut cols[1], "rate_trend", "Average Hourly Rate Trend", "$/hr", &dash.trends, rates, RATE_COLOR);
    });
}

/// `[month index, mean rate]` for months that have a mean.
pub fn rate_series(trends: &[TrendPoint]) -> Vec<[f64; 2]> {
    trends
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.mean_rate.map(|m| [i as f64, m]))
        .collect()
}

/// Axis label for a grid mark: the month at a whole index, nothing between.
pub fn month_tick(months: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    months.get(idx as usize).cloned().unwrap_or_default()
}

fn trend_plot(
    ui: &mut Ui,
    id: &str,
    title: &str,
    y_label: &str,
    trends: &[TrendPoint],
    series: Vec<[f64; 2]>,
    color: Color32,
) {
    ui.strong(title);
    let months: Vec<String> = trends.iter().map(|p| p.month.clone()).collect();

    Plot::new(id)
        .height(220.0)
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark, _range| month_tick(&months, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(series.clone()))
                    .name(title)
                    .color(color)
                    .width(2.0),
            );
            plot_ui.points(Points::new(PlotPoints::from(series)).color(color).radius(3.0));
        });
}
