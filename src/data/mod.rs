/// Data layer: core types, loading, and column clean-up.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (header on the configured row)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  drop unlabeled columns, rename mass balance
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ ClimateDataset  │  years, temperature series, mass balance
///   └────────────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
