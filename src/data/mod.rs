/// Data layer: core types, loading, filtering and monthly trends.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, coerce cells → JobTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ JobTable  │  Vec<JobListing> with derived columns, read-only
///   └──────────┘
///      │     │
///      ▼     ▼
///   ┌────────┐ ┌────────┐
///   │ filter │ │ trend  │  criteria → matching indices / month → count, mean rate
///   └────────┘ └────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod trend;
