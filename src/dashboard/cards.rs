//! Card components for the dashboard.
//!
//! Provides:
//! - Summary cards for total spending, this month, the weekly average and the top category
//! - One card per expense, newest first, with a delete button
//! - The empty state shown when no expense matches the filters

use maud::{Markup, html};

use crate::{
    dashboard::AggregationResult,
    endpoints::{self, format_endpoint},
    expense::{Category, ExpenseRecord, category_name},
    html::{BUTTON_DELETE_STYLE, format_currency, format_date, link},
};

const NO_DESCRIPTION: &str = "No description";

/// The ID of the form holding the filter selects. Requests that re-render the
/// dashboard include its values so the current filters are kept.
pub(super) const FILTER_FORM_ID: &str = "dashboard-filters";

/// The ID of the element that is swapped when the dashboard content changes.
pub(super) const DASHBOARD_CONTENT_ID: &str = "dashboard-content";

fn summary_card(title: &str, value: &str) -> Markup {
    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-4 shadow-md"
        {
            h4 class="text-sm font-medium text-gray-600 dark:text-gray-400 mb-1" { (title) }
            div class="text-2xl font-bold truncate" data-summary=(title) title=(value) { (value) }
        }
    }
}

/// Renders the four summary cards.
pub(super) fn summary_cards_view(result: &AggregationResult) -> Markup {
    html! {
        section id="summary" class="w-full mx-auto mb-8"
        {
            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
            {
                (summary_card("Total Spending", &format_currency(result.total)))
                (summary_card("This Month", &format_currency(result.current_month_total)))
                (summary_card("Weekly Average", &format_currency(result.weekly_average)))
                (summary_card("Top Category", &result.top_category))
            }
        }
    }
}

/// Renders the list of expense cards sorted by date, newest first.
///
/// Shows the empty state if `records` is empty.
pub(super) fn expense_cards_view(records: &[ExpenseRecord], categories: &[Category]) -> Markup {
    if records.is_empty() {
        return empty_state_view();
    }

    let mut records: Vec<&ExpenseRecord> = records.iter().collect();
    records.sort_by(|a, b| b.date.cmp(&a.date));

    html! {
        section id="expenses" class="w-full mx-auto mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Expenses" }

            div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4"
            {
                @for record in records {
                    (expense_card(record, categories))
                }
            }
        }
    }
}

fn expense_card(record: &ExpenseRecord, categories: &[Category]) -> Markup {
    let delete_url = format_endpoint(endpoints::EXPENSE, record.id);
    let description = if record.description.is_empty() {
        NO_DESCRIPTION
    } else {
        &record.description
    };

    html! {
        article
            class="expense-card bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col gap-2"
            data-expense-id=(record.id)
        {
            div class="flex justify-between items-start gap-2"
            {
                span
                    class="expense-category inline-flex items-center px-2.5 py-0.5
                        text-xs font-semibold text-blue-800 bg-blue-100 rounded-full
                        dark:bg-blue-900 dark:text-blue-300"
                {
                    (category_name(categories, record.category_id))
                }

                span class="expense-date text-sm text-gray-600 dark:text-gray-400"
                {
                    (format_date(record.date))
                }
            }

            @if !record.title.is_empty() {
                h4 class="expense-title text-lg font-semibold truncate" { (record.title) }
            }

            div class="expense-amount text-2xl font-bold" { (format_currency(record.amount)) }

            p class="expense-description text-sm text-gray-600 dark:text-gray-400"
            {
                (description)
            }

            div class="flex justify-end"
            {
                button
                    type="button"
                    class=(BUTTON_DELETE_STYLE)
                    hx-delete=(delete_url)
                    hx-confirm="Are you sure you want to delete this expense?"
                    hx-include={ "#" (FILTER_FORM_ID) }
                    hx-target={ "#" (DASHBOARD_CONTENT_ID) }
                    hx-target-error="#alert-container"
                    hx-swap="outerHTML"
                    hx-disabled-elt="this"
                {
                    "Delete"
                }
            }
        }
    }
}

/// Renders the prompt shown when there are no expenses to display.
pub(super) fn empty_state_view() -> Markup {
    let new_expense_link = link(endpoints::NEW_EXPENSE_VIEW, "add an expense");

    html! {
        section id="empty-state" class="flex flex-col items-center w-full py-8"
        {
            h3 class="text-xl font-bold" { "No expenses found" }

            p
            {
                "Try changing the filters or " (new_expense_link) "."
            }
        }
    }
}
