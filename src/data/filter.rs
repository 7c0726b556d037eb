use chrono::{NaiveDate, NaiveDateTime};

use super::model::{JobListing, JobTable};

/// Country selection meaning "no constraint".
pub const ALL_COUNTRIES: &str = "All";

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobType {
    #[default]
    All,
    /// Listings with an hourly rate.
    Hourly,
    /// Listings with a fixed budget.
    FixedOrPermanent,
}

impl JobType {
    pub const VARIANTS: [JobType; 3] = [JobType::All, JobType::Hourly, JobType::FixedOrPermanent];

    pub fn label(&self) -> &'static str {
        match self {
            JobType::All => "All",
            JobType::Hourly => "Hourly",
            JobType::FixedOrPermanent => "Fixed / Permanent",
        }
    }
}

/// Inclusive range of publication days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// A range exists only when both ends are supplied.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        Some(DateRange {
            start: start?,
            end: end?,
        })
    }

    /// Compares calendar days, so any time on `end` is still inside.
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        let day = ts.date();
        self.start <= day && day <= self.end
    }
}

/// One filter action. Neutral values (`"All"`, `0`, `false`, `None`, `""`)
/// impose no constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub country: String,
    pub job_type: JobType,
    pub min_rate: f64,
    pub remote_only: bool,
    pub date_range: Option<DateRange>,
    pub keyword: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            country: ALL_COUNTRIES.to_string(),
            job_type: JobType::All,
            min_rate: 0.0,
            remote_only: false,
            date_range: None,
            keyword: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Predicate composition
// ---------------------------------------------------------------------------

pub type Predicate<'a> = Box<dyn Fn(&JobListing) -> bool + 'a>;

impl FilterCriteria {
    /// One predicate per active constraint. Inactive constraints add nothing,
    /// so an empty list means every row passes.
    pub fn predicates(&self) -> Vec<Predicate<'_>> {
        let mut preds: Vec<Predicate<'_>> = Vec::new();

        if !self.country.eq_ignore_ascii_case(ALL_COUNTRIES) {
            let needle = self.country.to_lowercase();
            preds.push(Box::new(move |row: &JobListing| row.country.to_lowercase().contains(&needle)));
        }

        match self.job_type {
            JobType::All => {}
            JobType::Hourly => preds.push(Box::new(|row: &JobListing| row.hourly_avg.is_some())),
            JobType::FixedOrPermanent => preds.push(Box::new(|row: &JobListing| row.budget.is_some())),
        }

        if self.min_rate > 0.0 {
            let min = self.min_rate;
            preds.push(Box::new(move |row: &JobListing| row.hourly_avg.is_some_and(|avg| avg >= min)));
        }

        if self.remote_only {
            preds.push(Box::new(|row: &JobListing| row.clean_title.contains("remote")));
        }

        // Blank input is inactive; otherwise the keyword is matched as typed.
        if !self.keyword.trim().is_empty() {
            let needle = self.keyword.to_lowercase();
            preds.push(Box::new(move |row: &JobListing| row.clean_title.contains(&needle)));
        }

        if let Some(range) = self.date_range {
            preds.push(Box::new(move |row: &JobListing| {
                row.published_date.as_ref().is_some_and(|d| range.contains(d))
            }));
        }

        preds
    }

    /// Whether a single row passes every active constraint.
    pub fn matches(&self, row: &JobListing) -> bool {
        self.predicates().iter().all(|p| p(row))
    }
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Return indices of listings that pass all active constraints, in table order.
pub fn filtered_indices(table: &JobTable, criteria: &FilterCriteria) -> Vec<usize> {
    let preds = criteria.predicates();
    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| preds.iter().all(|p| p(*row)))
        .map(|(i, _)| i)
        .collect()
}

/// Borrowing view of the matching listings, in table order.
pub fn filter<'a>(table: &'a JobTable, criteria: &FilterCriteria) -> Vec<&'a JobListing> {
    filtered_indices(table, criteria)
        .into_iter()
        .filter_map(|i| table.get(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn listing(title: &str, country: &str, date: Option<&str>, avg: Option<f64>, budget: Option<f64>) -> JobListing {
        let date = date.map(|d| day(d).and_hms_opt(12, 0, 0).unwrap());
        JobListing::new(Some(title.into()), Some(country.into()), date, avg, avg, budget)
    }

    fn sample() -> JobTable {
        JobTable::from_rows(vec![
            listing("Remote Backend Engineer", "United States", Some("2024-02-15"), Some(30.0), None),
            listing("Backend Engineer", "Spain", Some("2024-03-01"), Some(10.0), None),
            listing("Logo design", "United Kingdom", None, None, Some(200.0)),
            listing("Data analyst (remote)", "India", Some("2024-02-29"), Some(25.0), Some(500.0)),
            listing("Copywriter", "Unknown", Some("2024-02-01"), None, None),
        ])
    }

    fn titles(rows: &[&JobListing]) -> Vec<String> {
        rows.iter().map(|r| r.title.clone()).collect()
    }

    #[test]
    fn neutral_criteria_keep_everything_in_order() {
        let table = sample();
        let result = filter(&table, &FilterCriteria::default());
        assert_eq!(result.len(), table.len());
        for (got, want) in result.iter().zip(table.rows()) {
            assert_eq!(*got, want);
        }
    }

    #[test]
    fn min_rate_excludes_absent_and_lower() {
        let table = JobTable::from_rows(vec![
            listing("a", "X", None, None, None),
            listing("b", "X", None, Some(10.0), None),
            listing("c", "X", None, Some(25.0), None),
            listing("d", "X", None, Some(30.0), None),
        ]);
        let criteria = FilterCriteria {
            min_rate: 25.0,
            ..Default::default()
        };
        let avgs: Vec<_> = filter(&table, &criteria).iter().map(|r| r.hourly_avg).collect();
        assert_eq!(avgs, vec![Some(25.0), Some(30.0)]);
    }

    #[test]
    fn remote_only_matches_clean_title() {
        let table = sample();
        let criteria = FilterCriteria {
            remote_only: true,
            ..Default::default()
        };
        assert_eq!(
            titles(&filter(&table, &criteria)),
            vec!["Remote Backend Engineer", "Data analyst (remote)"]
        );
    }

    #[test]
    fn date_range_is_inclusive_and_drops_undated() {
        let table = sample();
        let criteria = FilterCriteria {
            date_range: DateRange::from_bounds(Some(day("2024-02-01")), Some(day("2024-02-29"))),
            ..Default::default()
        };
        assert_eq!(
            titles(&filter(&table, &criteria)),
            vec!["Remote Backend Engineer", "Data analyst (remote)", "Copywriter"]
        );
    }

    #[test]
    fn half_open_date_range_is_ignored() {
        assert_eq!(DateRange::from_bounds(Some(day("2024-02-01")), None), None);
        assert_eq!(DateRange::from_bounds(None, Some(day("2024-02-01"))), None);
    }

    #[test]
    fn country_is_case_insensitive_substring() {
        let table = sample();
        let criteria = FilterCriteria {
            country: "united".into(),
            ..Default::default()
        };
        assert_eq!(
            titles(&filter(&table, &criteria)),
            vec!["Remote Backend Engineer", "Logo design"]
        );
    }

    #[test]
    fn job_type_selects_rate_or_budget() {
        let table = sample();
        let hourly = FilterCriteria {
            job_type: JobType::Hourly,
            ..Default::default()
        };
        assert_eq!(
            titles(&filter(&table, &hourly)),
            vec!["Remote Backend Engineer", "Backend Engineer", "Data analyst (remote)"]
        );
        let fixed = FilterCriteria {
            job_type: JobType::FixedOrPermanent,
            ..Default::default()
        };
        assert_eq!(titles(&filter(&table, &fixed)), vec!["Logo design", "Data analyst (remote)"]);
    }

    #[test]
    fn keyword_is_lowercased_but_not_trimmed() {
        let table = sample();
        let keyword = |k: &str| FilterCriteria {
            keyword: k.into(),
            ..Default::default()
        };
        assert_eq!(
            titles(&filter(&table, &keyword("BACKEND"))),
            vec!["Remote Backend Engineer", "Backend Engineer"]
        );
        // Padding is part of the needle: both titles end in "engineer".
        assert!(filter(&table, &keyword("engineer ")).is_empty());
        assert_eq!(titles(&filter(&table, &keyword(" backend"))), vec!["Remote Backend Engineer"]);
        assert_eq!(filter(&table, &keyword("   ")).len(), table.len());
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let table = sample();
        let criteria = FilterCriteria {
            keyword: "astronaut".into(),
            ..Default::default()
        };
        assert!(filtered_indices(&table, &criteria).is_empty());
    }

    #[test]
    fn filtering_is_idempotent_and_pure() {
        let table = sample();
        let before = table.rows().to_vec();
        let criteria = FilterCriteria {
            min_rate: 20.0,
            remote_only: true,
            ..Default::default()
        };
        let first = filtered_indices(&table, &criteria);
        let second = filtered_indices(&table, &criteria);
        assert_eq!(first, second);
        assert_eq!(table.rows(), before.as_slice());
    }

    #[test]
    fn every_output_row_satisfies_every_predicate() {
        let table = sample();
        let combos = [
            FilterCriteria {
                country: "in".into(),
                min_rate: 5.0,
                ..Default::default()
            },
            FilterCriteria {
                job_type: JobType::Hourly,
                date_range: DateRange::from_bounds(Some(day("2024-02-01")), Some(day("2024-03-31"))),
                ..Default::default()
            },
            FilterCriteria {
                job_type: JobType::FixedOrPermanent,
                keyword: "a".into(),
                remote_only: true,
                ..Default::default()
            },
        ];
        for criteria in &combos {
            let out = filter(&table, criteria);
            assert!(out.len() <= table.len());
            for row in &out {
                assert!(criteria.predicates().iter().all(|p| p(*row)));
            }
            let rejected = table.rows().iter().filter(|r| !criteria.matches(r)).count();
            assert_eq!(out.len() + rejected, table.len());
        }
    }
}
