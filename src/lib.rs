//! Loading, normalizing and filtering a curated list of theme-park food.
//!
//! The presentation layer pulls data through [`DatasetCache::load`], narrows
//! it with [`select`], and keeps per-user choices in a [`Session`].

pub mod config;
pub mod data;
pub mod error;
pub mod session;

pub use config::Config;
pub use data::cache::DatasetCache;
pub use data::filter::{select, selected_indices, Selection, SortKey};
pub use data::model::{FoodItem, FoodTable, PARKS};
pub use data::source::{DataSource, Fetch, HttpFetcher};
pub use error::{FetchError, LoadError};
pub use session::Session;
