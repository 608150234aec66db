//! The expense and category models shared by the API client and the pages.

use serde::{Deserialize, Serialize};
use time::Date;

/// The backend's ID for an expense.
pub type ExpenseId = i64;

/// The backend's ID for a category.
pub type CategoryId = i64;

/// The label used for expenses whose category cannot be found.
pub const OTHER_CATEGORY_LABEL: &str = "Other";

/// A user defined label that groups expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The backend's ID for the category.
    pub id: CategoryId,
    /// The display name, e.g. "Food".
    pub name: String,
}

/// One logged spending event as fetched from the backend.
///
/// Records are never edited in place, a changed expense is fetched again.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    /// The backend's ID for the expense.
    pub id: ExpenseId,
    /// A short name for the expense. Empty when the backend does not store one.
    pub title: String,
    /// The category the expense belongs to, if any.
    pub category_id: Option<CategoryId>,
    /// The amount spent.
    pub amount: f64,
    /// The day the money was spent.
    pub date: Date,
    /// Optional free text, empty when absent.
    pub description: String,
}

/// Find the name of the category with `category_id`, or [OTHER_CATEGORY_LABEL].
pub fn category_name(categories: &[Category], category_id: Option<CategoryId>) -> &str {
    category_id
        .and_then(|id| categories.iter().find(|category| category.id == id))
        .map(|category| category.name.as_str())
        .unwrap_or(OTHER_CATEGORY_LABEL)
}

/// The data needed to create an expense in the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpense {
    /// A short name for the expense.
    pub title: String,
    /// The ID of the expense's category.
    pub category: CategoryId,
    /// The amount spent, finite and not negative.
    pub amount: f64,
    /// The day the money was spent.
    pub date: Date,
    /// Optional free text.
    pub description: String,
}
