//! Dashboard module
//!
//! Provides an overview page summarising the user's expenses with cards and
//! charts. The expenses shown can be filtered by category and month.

mod aggregation;
mod cards;
mod charts;
mod filter;
mod handlers;
mod selection;

pub use aggregation::{AggregationOptions, AggregationResult, aggregate};
pub use filter::{CategoryFilter, FilterQuery, FilterState, MonthFilter};
pub use handlers::{DashboardState, get_dashboard_content, get_dashboard_page, reset_dashboard};
pub use selection::select_records;

pub(crate) use handlers::{dashboard_content_view, load_dashboard};
