//! Dashboard module
//!
//! Converts raw, possibly-sparse transaction rows into fixed-shape
//! numeric series and category maps suitable for direct chart
//! consumption, for a single user and a trailing-7-day window.

mod aggregation;
mod core;
mod handlers;
mod transaction;

pub use self::core::{CategorySummary, TypeFilter, WeeklySeries};
pub use handlers::{get_category_summary, get_weekly_series};
