/// Data layer: core types, loading, caching and filtering.
///
/// Architecture:
/// ```text
///  embedded rows / remote CSV export / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  fetch bytes (HTTP) or read file
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + normalize → FoodTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  Arc<FoodTable> memo, TTL window
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  park / areas / priority / eats → ordered rows
///   └──────────┘
/// ```

pub mod cache;
pub mod embedded;
pub mod filter;
pub mod loader;
pub mod model;
pub mod source;
