use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, NaiveDate};

use crate::color::CountryColors;
use crate::config::Config;
use crate::data::filter::{filtered_indices, DateRange, FilterCriteria, JobType, ALL_COUNTRIES};
use crate::data::loader::LoadError;
use crate::data::model::{JobListing, JobTable, TrendPoint};
use crate::data::trend::aggregate;

/// Upper bound of the minimum-rate slider.
pub const MAX_RATE_FILTER: u32 = 200;

// ---------------------------------------------------------------------------
// Loaded dataset and everything derived from it
// ---------------------------------------------------------------------------

/// The canonical table plus values computed once from it.
///
/// Replaced as a whole when another file is opened, which is the only way
/// the memoised trends get invalidated.
pub struct Dashboard {
    pub table: Arc<JobTable>,
    /// Always over the full table, never the filtered subset.
    pub trends: Vec<TrendPoint>,
    pub countries: Vec<String>,
    pub country_colors: CountryColors,
}

impl Dashboard {
    pub fn new(table: Arc<JobTable>) -> Self {
        let trends = aggregate(&table);
        let countries = table.countries();
        let country_colors = CountryColors::new(&countries);
        Dashboard {
            table,
            trends,
            countries,
            country_colors,
        }
    }
}

// ---------------------------------------------------------------------------
// Widget-bound filter values
// ---------------------------------------------------------------------------

/// What the side panel edits. Turned into a [`FilterCriteria`] on "Show Jobs".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterControls {
    pub country: String,
    pub job_type: JobType,
    pub min_rate: u32,
    pub remote_only: bool,
    pub use_date_range: bool,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub keyword: String,
}

impl FilterControls {
    /// Neutral controls, date pickers pre-set to the table's date span.
    pub fn for_table(table: &JobTable) -> Self {
        let mut days = table
            .rows()
            .iter()
            .filter_map(|r| r.published_date.map(|d| d.date()));
        let first = days.next();
        let (lo, hi) = days.fold((first, first), |(lo, hi), d| {
            (lo.map(|l| l.min(d)), hi.map(|h| h.max(d)))
        });
        let today = Local::now().date_naive();

        FilterControls {
            country: ALL_COUNTRIES.to_string(),
            job_type: JobType::All,
            min_rate: 0,
            remote_only: false,
            use_date_range: false,
            date_start: lo.unwrap_or(today),
            date_end: hi.unwrap_or(today),
            keyword: String::new(),
        }
    }

    pub fn criteria(&self) -> FilterCriteria {
        let date_range = if self.use_date_range {
            DateRange::from_bounds(Some(self.date_start), Some(self.date_end))
        } else {
            None
        };
        FilterCriteria {
            country: self.country.clone(),
            job_type: self.job_type,
            min_rate: f64::from(self.min_rate.min(MAX_RATE_FILTER)),
            remote_only: self.remote_only,
            date_range,
            keyword: self.keyword.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Loaded dataset (None when the startup load failed).
    pub dashboard: Option<Dashboard>,

    pub controls: FilterControls,

    /// Indices of listings passing the last applied filters (cached).
    pub visible_indices: Vec<usize>,

    /// Whether "Show Jobs" has been pressed since the last load / reset.
    pub filters_applied: bool,

    /// Startup load failure. Shown instead of the dashboard.
    pub fatal_error: Option<String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: Config, loaded: Result<JobTable, LoadError>) -> Self {
        let mut state = Self {
            config,
            dashboard: None,
            controls: FilterControls::for_table(&JobTable::default()),
            visible_indices: Vec::new(),
            filters_applied: false,
            fatal_error: None,
            status_message: None,
        };
        match loaded {
            Ok(table) => state.set_dataset(table),
            Err(e) => state.fatal_error = Some(e.to_string()),
        }
        state
    }

    /// Ingest a newly loaded table: recompute trends, reset controls.
    pub fn set_dataset(&mut self, table: JobTable) {
        self.controls = FilterControls::for_table(&table);
        self.visible_indices = (0..table.len()).collect();
        self.dashboard = Some(Dashboard::new(Arc::new(table)));
        self.filters_applied = false;
        self.fatal_error = None;
        self.status_message = None;
    }

    /// Run the filter engine with the current controls.
    pub fn apply_filters(&mut self) {
        let Some(dash) = &self.dashboard else {
            return;
        };
        let criteria = self.controls.criteria();
        let started = Instant::now();
        self.visible_indices = filtered_indices(&dash.table, &criteria);
        self.filters_applied = true;
        log::info!(
            "Filters applied: {} of {} listings match ({:.1?})",
            self.visible_indices.len(),
            dash.table.len(),
            started.elapsed()
        );
        log::debug!("criteria: {criteria:?}");
    }

    /// Back to the unfiltered table with neutral controls.
    pub fn reset_filters(&mut self) {
        if let Some(dash) = &self.dashboard {
            self.controls = FilterControls::for_table(&dash.table);
            self.visible_indices = (0..dash.table.len()).collect();
        }
        self.filters_applied = false;
    }

    /// Listings to render as cards: the visible set, capped.
    pub fn displayed(&self) -> Vec<&JobListing> {
        let Some(dash) = &self.dashboard else {
            return Vec::new();
        };
        self.visible_indices
            .iter()
            .take(self.config.display_cap)
            .filter_map(|&i| dash.table.get(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;

    fn row(title: &str, date: &str, avg: Option<f64>) -> JobListing {
        let date = NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S").ok();
        JobListing::new(Some(title.into()), Some("Chile".into()), date, avg, avg, None)
    }

    fn table() -> JobTable {
        JobTable::from_rows(vec![
            row("Remote tester", "2024-02-10 09:00:00", Some(40.0)),
            row("Translator", "2024-03-02 09:00:00", None),
            row("Remote designer", "2024-03-20 09:00:00", Some(12.0)),
        ])
    }

    fn state() -> AppState {
        AppState::new(Config::default(), Ok(table()))
    }

    #[test]
    fn starts_unfiltered_with_full_trends() {
        let state = state();
        assert!(!state.filters_applied);
        assert_eq!(state.displayed().len(), 3);
        let dash = state.dashboard.as_ref().unwrap();
        assert_eq!(dash.trends.len(), 2);
        assert_eq!(dash.countries, vec!["Chile"]);
    }

    #[test]
    fn controls_span_table_dates() {
        let controls = FilterControls::for_table(&table());
        assert_eq!(controls.date_start.to_string(), "2024-02-10");
        assert_eq!(controls.date_end.to_string(), "2024-03-20");
        assert_eq!(controls.criteria(), FilterCriteria::default());
    }

    #[test]
    fn apply_then_reset() {
        let mut state = state();
        state.controls.remote_only = true;
        state.controls.min_rate = 20;
        state.apply_filters();
        assert!(state.filters_applied);
        let titles: Vec<_> = state.displayed().iter().map(|r| r.title.clone()).collect();
        assert_eq!(titles, vec!["Remote tester"]);
        assert_eq!(state.dashboard.as_ref().unwrap().trends.len(), 2);

        state.reset_filters();
        assert!(!state.filters_applied);
        assert_eq!(state.displayed().len(), 3);
        assert!(!state.controls.remote_only);
    }

    #[test]
    fn date_range_only_when_enabled() {
        let mut state = state();
        state.controls.date_start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        state.controls.date_end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        state.apply_filters();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);

        state.controls.use_date_range = true;
        state.apply_filters();
        assert_eq!(state.visible_indices, vec![1, 2]);
    }

    #[test]
    fn display_is_capped() {
        let rows = (0..250).map(|i| row(&format!("job {i}"), "2024-02-01 00:00:00", None)).collect();
        let state = AppState::new(Config::default(), Ok(JobTable::from_rows(rows)));
        assert_eq!(state.visible_indices.len(), 250);
        let shown = state.displayed();
        assert_eq!(shown.len(), 100);
        assert_eq!(shown[0].title, "job 0");
        assert_eq!(shown[99].title, "job 99");
    }

    #[test]
    fn load_error_leaves_no_dashboard() {
        let err = LoadError::NotTabular("broken".into());
        let state = AppState::new(Config::default(), Err(err));
        assert!(state.dashboard.is_none());
        assert!(state.fatal_error.as_deref().unwrap().contains("broken"));
        assert!(state.displayed().is_empty());
    }

    #[test]
    fn new_dataset_replaces_trends() {
        let mut state = state();
        state.set_dataset(JobTable::from_rows(vec![row("Solo", "2023-07-01 00:00:00", None)]));
        let dash = state.dashboard.as_ref().unwrap();
        assert_eq!(dash.trends.len(), 1);
        assert_eq!(dash.trends[0].month, "2023-07");
    }
}
