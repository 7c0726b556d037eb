use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::array::{Array, ArrayRef};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{parse_number, parse_timestamp, JobListing, JobTable};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a dataset could not be loaded. Always fatal for that load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("dataset not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("unsupported file extension: .{extension}")]
    UnsupportedFormat { extension: String },
    #[error("dataset has no '{column}' column")]
    MissingColumn { column: &'static str },
    #[error("dataset is not tabular: {0}")]
    NotTabular(String),
    #[error("reading dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("decoding parquet batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

/// The only column a listings file must carry.
const REQUIRED_COLUMN: &str = "title";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a job listings table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` – header row with at least a `title` column
/// * `.json`         – `[{ "title": ..., "country": ..., ... }, ...]`
/// * `.parquet`      – any column types, cells are coerced from their text form
///
/// Cells that fail to coerce become absent; only file-level problems are errors.
pub fn load_file(path: &Path) -> Result<JobTable, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let started = Instant::now();
    let mut stats = CoercionStats::default();
    let raw = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path, &mut stats)?,
        other => {
            return Err(LoadError::UnsupportedFormat {
                extension: other.to_string(),
            })
        }
    };

    let rows: Vec<JobListing> = raw.into_iter().map(|r| r.into_listing(&mut stats)).collect();
    let table = JobTable::from_rows(rows);

    log::debug!(
        "coercion: {} dates, {} numbers and {} unreadable cells degraded to absent",
        stats.bad_dates,
        stats.bad_numbers,
        stats.bad_cells
    );
    log::info!(
        "Loaded {} listings ({} countries) from {} in {:.1?}",
        table.len(),
        table.countries().len(),
        path.display(),
        started.elapsed()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Raw rows and coercion
// ---------------------------------------------------------------------------

/// One source row before type coercion. Every column is optional text.
#[derive(Debug, Deserialize)]
struct RawListing {
    title: Option<String>,
    country: Option<String>,
    published_date: Option<String>,
    hourly_low: Option<String>,
    hourly_high: Option<String>,
    budget: Option<String>,
}

#[derive(Debug, Default)]
struct CoercionStats {
    bad_dates: usize,
    bad_numbers: usize,
    /// Parquet cells that could not even be rendered to text.
    bad_cells: usize,
}

impl RawListing {
    fn into_listing(self, stats: &mut CoercionStats) -> JobListing {
        let published_date = coerce(self.published_date, parse_timestamp, &mut stats.bad_dates);
        let hourly_low = coerce(self.hourly_low, parse_number, &mut stats.bad_numbers);
        let hourly_high = coerce(self.hourly_high, parse_number, &mut stats.bad_numbers);
        let budget = coerce(self.budget, parse_number, &mut stats.bad_numbers);

        JobListing::new(
            self.title,
            self.country,
            published_date,
            hourly_low,
            hourly_high,
            budget,
        )
    }
}

/// Empty cells are absent; non-empty cells that fail to parse are counted.
fn coerce<T>(raw: Option<String>, parse: fn(&str) -> Option<T>, failures: &mut usize) -> Option<T> {
    let raw = raw.filter(|s| !s.trim().is_empty())?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        *failures += 1;
    }
    parsed
}

// ---------------------------------------------------------------------------
// CSV / TSV loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<Vec<RawListing>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)?;

    let headers = reader.headers()?;
    if !headers.iter().any(|h| h == REQUIRED_COLUMN) {
        return Err(LoadError::MissingColumn {
            column: REQUIRED_COLUMN,
        });
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (row_no, result) in reader.deserialize::<RawListing>().enumerate() {
        match result {
            Ok(raw) => rows.push(raw),
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                log::warn!("skipping CSV row {row_no}: {e}");
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        log::warn!("{skipped} undecodable rows skipped in {}", path.display());
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "title": "Rust developer", "country": "Spain", "hourly_low": 30, "hourly_high": 45 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<RawListing>, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::NotTabular("expected a top-level JSON array".to_string()))?;

    if !records.is_empty()
        && !records
            .iter()
            .filter_map(|r| r.as_object())
            .any(|o| o.contains_key(REQUIRED_COLUMN))
    {
        return Err(LoadError::MissingColumn {
            column: REQUIRED_COLUMN,
        });
    }

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let Some(obj) = rec.as_object() else {
            log::warn!("skipping JSON row {i}: not an object");
            continue;
        };
        let cell = |key: &str| obj.get(key).and_then(json_to_text);
        rows.push(RawListing {
            title: cell("title"),
            country: cell("country"),
            published_date: cell("published_date"),
            hourly_low: cell("hourly_low"),
            hourly_high: cell("hourly_high"),
            budget: cell("budget"),
        });
    }
    Ok(rows)
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet export of the listings.
///
/// Column types are not prescribed: strings, numbers and timestamps are all
/// rendered to text and coerced like CSV cells. Works with files written by
/// both **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path, stats: &mut CoercionStats) -> Result<Vec<RawListing>, LoadError> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    if builder.schema().index_of(REQUIRED_COLUMN).is_err() {
        return Err(LoadError::MissingColumn {
            column: REQUIRED_COLUMN,
        });
    }
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();
        let column = |name: &str| schema.index_of(name).ok().map(|i| batch.column(i));

        let title = column("title");
        let country = column("country");
        let published_date = column("published_date");
        let hourly_low = column("hourly_low");
        let hourly_high = column("hourly_high");
        let budget = column("budget");

        for row in 0..batch.num_rows() {
            // A cell arrow cannot display (e.g. a named timezone) is absent, not fatal.
            let mut cell = |col: Option<&ArrayRef>| match col {
                Some(c) if !c.is_null(row) => match array_value_to_string(c.as_ref(), row) {
                    Ok(text) => Some(text),
                    Err(e) => {
                        log::trace!("parquet row {row}: {e}");
                        stats.bad_cells += 1;
                        None
                    }
                },
                _ => None,
            };
            rows.push(RawListing {
                title: cell(title),
                country: cell(country),
                published_date: cell(published_date),
                hourly_low: cell(hourly_low),
                hourly_high: cell(hourly_high),
                budget: cell(budget),
            });
        }
    }
    Ok(rows)
}
