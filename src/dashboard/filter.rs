//! The category and month filters selected on the dashboard.

use std::fmt;

use serde::Deserialize;

use crate::{Error, expense::CategoryId, year_month::YearMonth};

/// The value of a filter parameter that matches everything.
pub const ALL: &str = "all";

/// Restricts the dashboard to one category.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every category, including expenses without one.
    #[default]
    All,
    /// Only expenses in the category with this ID.
    Category(CategoryId),
}

/// Restricts the dashboard to one calendar month.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    /// Every month.
    #[default]
    All,
    /// Only expenses dated within this month.
    Month(YearMonth),
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL),
            CategoryFilter::Category(id) => write!(f, "{id}"),
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str(ALL),
            MonthFilter::Month(year_month) => write!(f, "{year_month}"),
        }
    }
}

/// The filter parameters as they arrive in a query string.
///
/// Missing, empty and "all" values all mean "no filter".
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FilterQuery {
    /// A category ID or "all".
    pub category: Option<String>,
    /// A month written as YYYY-MM or "all".
    pub month: Option<String>,
}

/// The filters currently applied to the dashboard.
///
/// Each request builds its own filter state, the canonical default shows everything.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterState {
    /// The selected category.
    pub category: CategoryFilter,
    /// The selected month.
    pub month: MonthFilter,
}

impl FilterState {
    /// Show only expenses in `category`.
    ///
    /// An ID that does not match any category is accepted and simply matches nothing.
    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
    }

    /// Show only expenses in `month`.
    pub fn set_month(&mut self, month: MonthFilter) {
        self.month = month;
    }

    /// Clear both filters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether neither filter restricts the expenses shown.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Build the filter state from query parameters.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidFilter] if the category is not an integer or the
    /// month is not of the form YYYY-MM.
    pub fn from_query(query: &FilterQuery) -> Result<Self, Error> {
        let mut state = Self::default();

        if let Some(category) = filter_value(query.category.as_deref()) {
            let id = category.parse::<CategoryId>().map_err(|_| {
                Error::InvalidFilter(format!("\"{category}\" is not a category ID"))
            })?;
            state.set_category(CategoryFilter::Category(id));
        }

        if let Some(month) = filter_value(query.month.as_deref()) {
            state.set_month(MonthFilter::Month(month.parse()?));
        }

        Ok(state)
    }

    /// The query parameters the REST backend expects for this filter state.
    ///
    /// Filters that match everything are omitted.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let CategoryFilter::Category(id) = self.category {
            pairs.push(("category", id.to_string()));
        }

        if let MonthFilter::Month(year_month) = self.month {
            pairs.push(("month", year_month.to_string()));
        }

        pairs
    }
}

fn filter_value(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case(ALL))
}
