use std::path::PathBuf;

use clap::{Parser, ValueHint};

pub const DEFAULT_DATA_PATH: &str = "all_upwork_jobs_2024-02-07-2024-03-24.csv";
pub const DEFAULT_DISPLAY_CAP: usize = 100;
pub const DEFAULT_LINK_BASE: &str = "https://www.upwork.com/nx/search/jobs/";

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

/// Startup options. Every flag can also come from the environment.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Browse and filter a job listings export", long_about = None)]
pub struct Config {
    /// Listings file (.csv, .tsv, .json or .parquet)
    #[arg(
        env = "RUSTY_GIGS_DATA",
        default_value = DEFAULT_DATA_PATH,
        value_hint = ValueHint::FilePath
    )]
    pub data: PathBuf,

    /// Maximum number of job cards rendered at once
    #[arg(long, env = "RUSTY_GIGS_DISPLAY_CAP", default_value_t = DEFAULT_DISPLAY_CAP)]
    pub display_cap: usize,

    /// Base URL that outbound search links are built on
    #[arg(long, env = "RUSTY_GIGS_LINK_BASE", default_value = DEFAULT_LINK_BASE)]
    pub link_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: PathBuf::from(DEFAULT_DATA_PATH),
            display_cap: DEFAULT_DISPLAY_CAP,
            link_base: DEFAULT_LINK_BASE.to_string(),
        }
    }
}
