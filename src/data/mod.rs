/// Data layer: record types, loading, and the table transformations.
///
/// Pipeline:
/// ```text
///  {anls-type}.csv  (tab-separated)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<JobRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  normalize → select target → group by date
///   │           │  → date window → drop outliers
///   └──────────┘
///        │
///        ▼
///   DailySeries   date-sorted daily mean durations (hours)
/// ```

pub mod filter;
pub mod loader;
pub mod model;
