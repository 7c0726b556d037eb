use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Country used when the source row has none.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

// ---------------------------------------------------------------------------
// JobListing – one row of the dataset
// ---------------------------------------------------------------------------

/// A single job listing with its derived columns.
///
/// Derived fields are filled once by [`JobListing::new`] and never
/// recomputed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct JobListing {
    pub title: String,
    /// Free-text country, `"Unknown"` when missing.
    pub country: String,
    pub published_date: Option<NaiveDateTime>,
    pub hourly_low: Option<f64>,
    pub hourly_high: Option<f64>,
    pub budget: Option<f64>,
    /// Mean of the two rate bounds, only when both are present.
    pub hourly_avg: Option<f64>,
    /// Lowercased, punctuation-free title used for matching.
    pub clean_title: String,
    /// `YYYY-MM` of `published_date`.
    pub published_month: Option<String>,
}

impl JobListing {
    pub fn new(
        title: Option<String>,
        country: Option<String>,
        published_date: Option<NaiveDateTime>,
        hourly_low: Option<f64>,
        hourly_high: Option<f64>,
        budget: Option<f64>,
    ) -> Self {
        let title = title.unwrap_or_default();
        let country = country
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());
        let hourly_avg = match (hourly_low, hourly_high) {
            (Some(low), Some(high)) => Some((low + high) / 2.0),
            _ => None,
        };
        let clean_title = clean_title(&title);
        let published_month = published_date.map(|d| d.format("%Y-%m").to_string());

        JobListing {
            title,
            country,
            published_date,
            hourly_low,
            hourly_high,
            budget,
            hourly_avg,
            clean_title,
            published_month,
        }
    }
}

// ---------------------------------------------------------------------------
// Field normalisation
// ---------------------------------------------------------------------------

/// Lowercase, replace punctuation with spaces, collapse whitespace, trim.
///
/// Letters, digits and `_` count as word characters and are kept.
pub fn clean_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !(c.is_alphanumeric() || c == '_' || c.is_whitespace()), " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Coerce a raw cell to a number. Anything unparsable or non-finite is absent.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a raw cell to a timestamp. Offsets are normalised to UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const WITH_OFFSET: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];
    const NAIVE: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];
    const DATE_ONLY: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    WITH_OFFSET
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc).naive_utc())
        .or_else(|| {
            NAIVE
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        })
        .or_else(|| {
            DATE_ONLY
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// ---------------------------------------------------------------------------
// JobTable – the canonical loaded table
// ---------------------------------------------------------------------------

/// The immutable table produced by the loader.
#[derive(Debug, Clone, Default)]
pub struct JobTable {
    rows: Vec<JobListing>,
}

impl JobTable {
    pub fn from_rows(rows: Vec<JobListing>) -> Self {
        JobTable { rows }
    }

    pub fn rows(&self) -> &[JobListing] {
        &self.rows
    }

    pub fn get(&self, idx: usize) -> Option<&JobListing> {
        self.rows.get(idx)
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted distinct country values.
    pub fn countries(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// TrendPoint – one month of aggregated listings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    /// `YYYY-MM`
    pub month: String,
    pub count: usize,
    /// Mean `hourly_avg` over the month's rows that have one.
    pub mean_rate: Option<f64>,
}
