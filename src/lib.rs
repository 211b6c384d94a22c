//! Prep forecasting from last year's same-weekday sales.
//!
//! [`datemap::map_to_prior_year`] picks the comparison date; the other
//! modules load per-location sales exports, total them per item and apply a
//! percentage buffer.

pub mod config;
pub mod datemap;
pub mod error;
pub mod forecast;
pub mod loader;
pub mod output;
pub mod types;
pub mod util;

pub use datemap::{map_to_prior_year, map_with_path, DateMapping, MappingPath};
pub use error::PrepError;
