/// Data layer: core types, loading, filtering, aggregation, and export.
///
/// Architecture:
/// ```text
///      .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + clean → Dataset (cached per path + mtime)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Listing>, filter-option indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterCriteria → filtered Dataset
///   └──────────┘
///        │
///        ├──────────►  summary   (KPIs + aggregate views)
///        └──────────►  export    (filtered CSV artifact)
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
