//! Applies the dashboard filters to a set of expenses.

use crate::{
    dashboard::filter::{CategoryFilter, FilterState, MonthFilter},
    expense::ExpenseRecord,
};

/// Whether `record` passes both filters in `filter`.
pub fn matches(record: &ExpenseRecord, filter: &FilterState) -> bool {
    let category_matches = match filter.category {
        CategoryFilter::All => true,
        CategoryFilter::Category(id) => record.category_id == Some(id),
    };

    let month_matches = match filter.month {
        MonthFilter::All => true,
        MonthFilter::Month(year_month) => year_month.contains(record.date),
    };

    category_matches && month_matches
}

/// The records that pass `filter`, in their original order.
pub fn select_records(records: Vec<ExpenseRecord>, filter: &FilterState) -> Vec<ExpenseRecord> {
    records
        .into_iter()
        .filter(|record| matches(record, filter))
        .collect()
}
