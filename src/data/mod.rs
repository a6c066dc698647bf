/// Data layer: table model, loading, filtering and saving.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  header + rows of samples
///   └──────────┘
///      │      │
///      ▼      ▼
///  ┌────────┐ ┌────────┐
///  │ filter │ │ writer │  low-pass for display / CSV + Response column
///  └────────┘ └────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod writer;
