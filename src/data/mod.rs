/// Data layer: core types, container loading, and the dataset registry.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse container → DatasetRecord
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ DatasetRecord │  Table + fold labels + optional coordinates
///   └──────────────┘
///        ▲
///        │
///   ┌──────────┐
///   │ registry  │  dataset name → loader
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod registry;
