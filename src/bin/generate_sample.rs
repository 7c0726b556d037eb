//! Writes a deterministic synthetic listings file for manual runs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::StringArray;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use clap::Parser;
use parquet::arrow::ArrowWriter;

use rusty_gigs::data::filter::{filter, FilterCriteria};
use rusty_gigs::data::loader::load_file;
use rusty_gigs::data::trend::aggregate;

const COLUMNS: [&str; 6] = ["title", "country", "published_date", "hourly_low", "hourly_high", "budget"];

const ROLES: &[&str] = &[
    "Rust Developer",
    "Backend Engineer",
    "Data Analyst",
    "Logo Designer",
    "Copywriter",
    "WordPress Expert",
    "Virtual Assistant",
    "Video Editor",
];
const PREFIXES: &[&str] = &["", "", "Senior ", "Junior ", "Remote ", "Freelance "];
const SUFFIXES: &[&str] = &["", "", " (Remote)", " - long term", "!!", " / Part-time"];
const COUNTRIES: &[&str] = &[
    "United States",
    "United Kingdom",
    "India",
    "Canada",
    "Germany",
    "Australia",
    "Pakistan",
    "",
];

#[derive(Parser, Debug)]
#[command(about = "Generate a synthetic job listings export")]
struct Args {
    /// Output file; `.parquet` writes Parquet, anything else CSV
    #[arg(default_value = "sample_jobs.csv")]
    output: PathBuf,

    /// Number of listings
    #[arg(short = 'n', long, default_value_t = 2000)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// One row as raw cells, deliberately including values the loader must coerce.
fn generate_row(rng: &mut SimpleRng, first_day: NaiveDate, span_days: i64) -> [String; 6] {
    let title = format!("{}{}{}", rng.pick(PREFIXES), rng.pick(ROLES), rng.pick(SUFFIXES));
    let country = rng.pick(COUNTRIES).to_string();

    let published = if rng.chance(0.03) {
        "N/A".to_string()
    } else {
        let offset = (rng.next_f64() * span_days as f64) as i64;
        let secs = (rng.next_f64() * 86_399.0) as i64;
        let ts = first_day.and_hms_opt(0, 0, 0).unwrap_or_default()
            + Duration::days(offset)
            + Duration::seconds(secs);
        format!("{}+00:00", ts.format("%Y-%m-%d %H:%M:%S"))
    };

    let (mut low, mut high, mut budget) = (String::new(), String::new(), String::new());
    if rng.chance(0.55) {
        let lo = rng.range(5.0, 60.0).round();
        low = format!("{lo}");
        if !rng.chance(0.1) {
            high = format!("{}", (lo + rng.range(5.0, 60.0)).round());
        }
    } else if rng.chance(0.7) {
        budget = if rng.chance(0.05) {
            "negotiable".to_string()
        } else {
            format!("{}", (rng.range(50.0, 5000.0) / 10.0).round() * 10.0)
        };
    }

    [title, country, published, low, high, budget]
}

fn write_csv(path: &Path, rows: &[[String; 6]]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV output")?;
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[[String; 6]]) -> Result<()> {
    let schema = Arc::new(Schema::new(
        COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));
    let columns = (0..COLUMNS.len())
        .map(|c| {
            let cells: StringArray = rows
                .iter()
                .map(|r| Some(r[c].as_str()).filter(|s| !s.is_empty()))
                .collect();
            Arc::new(cells) as arrow::array::ArrayRef
        })
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut rng = SimpleRng::new(args.seed);
    let first_day = NaiveDate::from_ymd_opt(2024, 2, 7).context("invalid start date")?;
    let rows: Vec<[String; 6]> = (0..args.rows)
        .map(|_| generate_row(&mut rng, first_day, 47))
        .collect();

    let is_parquet = args
        .output
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        write_parquet(&args.output, &rows)?;
    } else {
        write_csv(&args.output, &rows)?;
    }

    // Read the file back through the real loader as a sanity check.
    let table = load_file(&args.output)
        .with_context(|| format!("reloading {}", args.output.display()))?;
    let remote = filter(
        &table,
        &FilterCriteria {
            remote_only: true,
            ..Default::default()
        },
    );
    println!(
        "Wrote {} listings to {} ({} remote)",
        table.len(),
        args.output.display(),
        remote.len()
    );
    for point in aggregate(&table) {
        let mean = point
            .mean_rate
            .map(|m| format!("${m:.2}/hr"))
            .unwrap_or_else(|| "-".to_string());
        println!("  {}  {:>5} postings  {mean}", point.month, point.count);
    }
    Ok(())
}
