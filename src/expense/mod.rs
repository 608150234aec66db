//! Expenses and their categories.
//!
//! This module contains:
//! - The `ExpenseRecord` and `Category` models
//! - The page and endpoint for adding an expense
//! - The endpoint for deleting an expense

mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod models;

pub use create_endpoint::create_expense_endpoint;
pub use create_page::get_new_expense_page;
pub use delete_endpoint::delete_expense_endpoint;
pub use models::{
    Category, CategoryId, ExpenseId, ExpenseRecord, NewExpense, OTHER_CATEGORY_LABEL,
    category_name,
};
