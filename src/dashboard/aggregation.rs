//! Expense aggregation for the summary cards and charts.
//!
//! [aggregate] does not filter: callers pass in the records that should be
//! counted, usually the output of [crate::select_records].

use time::Date;

use crate::{
    Error, MonthScope,
    expense::{Category, ExpenseRecord, category_name},
};

/// The label for the top category when there are no expenses.
pub const NO_TOP_CATEGORY: &str = "None";

/// Number of buckets in [AggregationResult::weekly_series].
pub const WEEKS_PER_MONTH: usize = 4;

/// Options that change how expenses are summarised.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AggregationOptions {
    /// Which expenses count towards [AggregationResult::current_month_total].
    pub month_scope: MonthScope,
}

/// The summary statistics and time series derived from a set of expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    /// Sum of all amounts.
    pub total: f64,
    /// Sum of the amounts in the reference month, see [MonthScope].
    pub current_month_total: f64,
    /// `total` divided by four.
    pub weekly_average: f64,
    /// Total per category name in the order each category was first seen.
    /// Expenses with an unknown category are grouped under "Other".
    pub per_category_totals: Vec<(String, f64)>,
    /// The category with the largest total, "None" if there are no expenses.
    pub top_category: String,
    /// Totals for January through December of the reference year.
    pub monthly_series: [f64; 12],
    /// Totals per week of the month, see [week_of_month].
    pub weekly_series: [f64; WEEKS_PER_MONTH],
}

/// The week bucket for `date`: days 1-6 are week 0, days 7-13 week 1,
/// days 14-20 week 2 and everything from day 21 is week 3.
pub fn week_of_month(date: Date) -> usize {
    (date.day() as usize / 7).min(WEEKS_PER_MONTH - 1)
}

/// Summarise `records` relative to `reference_date`.
///
/// # Errors
///
/// Returns [Error::InvalidInput] if any amount is NaN or infinite.
pub fn aggregate(
    records: &[ExpenseRecord],
    categories: &[Category],
    reference_date: Date,
    options: AggregationOptions,
) -> Result<AggregationResult, Error> {
    let mut total = 0.0;
    let mut current_month_total = 0.0;
    let mut per_category_totals: Vec<(String, f64)> = Vec::new();
    let mut monthly_series = [0.0; 12];
    let mut weekly_series = [0.0; WEEKS_PER_MONTH];

    for record in records {
        if !record.amount.is_finite() {
            return Err(Error::InvalidInput {
                expense_id: record.id,
                amount: record.amount.to_string(),
            });
        }

        let amount = record.amount;
        total += amount;

        if is_in_reference_month(record.date, reference_date, options.month_scope) {
            current_month_total += amount;
        }

        let name = category_name(categories, record.category_id);
        match per_category_totals
            .iter_mut()
            .find(|(category, _)| category == name)
        {
            Some((_, category_total)) => *category_total += amount,
            None => per_category_totals.push((name.to_owned(), amount)),
        }

        if record.date.year() == reference_date.year() {
            monthly_series[record.date.month() as usize - 1] += amount;
        }

        weekly_series[week_of_month(record.date)] += amount;
    }

    let top_category = top_category(&per_category_totals);

    Ok(AggregationResult {
        total,
        current_month_total,
        weekly_average: total / WEEKS_PER_MONTH as f64,
        per_category_totals,
        top_category,
        monthly_series,
        weekly_series,
    })
}

fn is_in_reference_month(date: Date, reference_date: Date, scope: MonthScope) -> bool {
    let same_month = date.month() == reference_date.month();

    match scope {
        MonthScope::MonthOfYear => same_month,
        MonthScope::CalendarMonth => same_month && date.year() == reference_date.year(),
    }
}

/// The name with the strictly largest total. Ties go to the category seen first.
fn top_category(per_category_totals: &[(String, f64)]) -> String {
    let mut top: Option<&(String, f64)> = None;

    for entry in per_category_totals {
        match top {
            Some((_, top_total)) if entry.1 <= *top_total => {}
            _ => top = Some(entry),
        }
    }

    top.map(|(name, _)| name.clone())
        .unwrap_or_else(|| NO_TOP_CATEGORY.to_owned())
}
