use std::collections::BTreeMap;

use super::model::{JobTable, TrendPoint};

#[derive(Default)]
struct MonthAccumulator {
    count: usize,
    rate_sum: f64,
    rated: usize,
}

/// Group listings by `published_month` into ascending monthly points.
///
/// Undated rows are left out entirely. The mean only covers rows with an
/// hourly average and is absent when a month has none.
pub fn aggregate(table: &JobTable) -> Vec<TrendPoint> {
    let mut months: BTreeMap<&str, MonthAccumulator> = BTreeMap::new();

    for row in table.rows() {
        let Some(month) = row.published_month.as_deref() else {
            continue;
        };
        let acc = months.entry(month).or_default();
        acc.count += 1;
        if let Some(avg) = row.hourly_avg {
            acc.rate_sum += avg;
            acc.rated += 1;
        }
    }

    months
        .into_iter()
        .map(|(month, acc)| TrendPoint {
            month: month.to_string(),
            count: acc.count,
            mean_rate: (acc.rated > 0).then(|| acc.rate_sum / acc.rated as f64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::model::JobListing;

    fn dated(date: Option<&str>, avg: Option<f64>) -> JobListing {
        let date = date.map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        });
        JobListing::new(Some("job".into()), None, date, avg, avg, None)
    }

    #[test]
    fn groups_by_month_in_order() {
        let table = JobTable::from_rows(vec![
            dated(Some("2024-03-05"), Some(20.0)),
            dated(Some("2024-02-10"), Some(10.0)),
            dated(Some("2024-02-20"), None),
        ]);
        assert_eq!(
            aggregate(&table),
            vec![
                TrendPoint {
                    month: "2024-02".into(),
                    count: 2,
                    mean_rate: Some(10.0),
                },
                TrendPoint {
                    month: "2024-03".into(),
                    count: 1,
                    mean_rate: Some(20.0),
                },
            ]
        );
    }

    #[test]
    fn undated_rows_are_excluded() {
        let table = JobTable::from_rows(vec![dated(None, Some(99.0)), dated(Some("2024-01-31"), Some(1.0))]);
        let points = aggregate(&table);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].count, 1);
        assert_eq!(points[0].mean_rate, Some(1.0));
    }

    #[test]
    fn month_without_rates_has_no_mean() {
        let table = JobTable::from_rows(vec![dated(Some("2024-02-01"), None), dated(Some("2024-02-02"), None)]);
        let points = aggregate(&table);
        assert_eq!(points[0].count, 2);
        assert_eq!(points[0].mean_rate, None);
    }

    #[test]
    fn empty_table_gives_empty_series() {
        assert!(aggregate(&JobTable::default()).is_empty());
    }

    #[test]
    fn months_sort_across_years() {
        let table = JobTable::from_rows(vec![
            dated(Some("2024-01-15"), None),
            dated(Some("2023-12-15"), None),
            dated(Some("2023-11-15"), None),
        ]);
        let months: Vec<_> = aggregate(&table).into_iter().map(|p| p.month).collect();
        assert_eq!(months, vec!["2023-11", "2023-12", "2024-01"]);
    }
}
