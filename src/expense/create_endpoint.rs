//! Defines the endpoint for adding a new expense.

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    ApiClient, AppState, Error,
    alert::Alert,
    auth::AccessToken,
    endpoints,
    expense::{CategoryId, NewExpense},
};

pub const MISSING_FIELDS_ERROR_MSG: &str = "Please fill in all required fields";
pub const CREATE_FAILED_ERROR_MSG: &str = "Failed to add expense";
const INVALID_AMOUNT_ERROR_MSG: &str = "Amount must be a number that is zero or more";
const INVALID_CATEGORY_ERROR_MSG: &str = "Please select a category";
const INVALID_DATE_ERROR_MSG: &str = "Please enter a valid date";

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The state needed to add an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The client for the REST backend that stores the expenses.
    pub api: ApiClient,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// The raw form data for adding an expense.
///
/// Every field is read as text so that missing and malformed values can be
/// reported to the user instead of rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

impl ExpenseForm {
    fn validate(self) -> Result<NewExpense, Error> {
        let title = self.title.trim();
        let category = self.category.trim();
        let amount = self.amount.trim();
        let date = self.date.trim();

        if [title, category, amount, date].iter().any(|field| field.is_empty()) {
            return Err(Error::Validation(MISSING_FIELDS_ERROR_MSG.to_owned()));
        }

        let category: CategoryId = category
            .parse()
            .map_err(|_| Error::Validation(INVALID_CATEGORY_ERROR_MSG.to_owned()))?;

        let amount = amount
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite() && *amount >= 0.0)
            .ok_or_else(|| Error::Validation(INVALID_AMOUNT_ERROR_MSG.to_owned()))?;

        let date = Date::parse(date, DATE_FORMAT)
            .map_err(|_| Error::Validation(INVALID_DATE_ERROR_MSG.to_owned()))?;

        Ok(NewExpense {
            title: title.to_owned(),
            category,
            amount,
            date,
            description: self.description.trim().to_owned(),
        })
    }
}

/// A route handler for adding a new expense, redirects to the dashboard on success.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Extension(token): Extension<AccessToken>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let new_expense = match form.validate() {
        Ok(new_expense) => new_expense,
        Err(error) => return error.into_alert_response(),
    };

    match state.api.create_expense(&token, &new_expense).await {
        Ok(expense) => {
            tracing::info!("Created expense {}", expense.id);
            (
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::Unauthorized) => Error::Unauthorized.into_alert_response(),
        Err(Error::UnexpectedStatus {
            status,
            detail: Some(detail),
        }) => {
            tracing::warn!("The backend rejected the new expense ({status}): {detail}");
            (StatusCode::BAD_REQUEST, Alert::ErrorSimple { message: detail }).into_response()
        }
        Err(error) => {
            tracing::error!("Could not create expense: {error}");
            (
                StatusCode::BAD_GATEWAY,
                Alert::ErrorSimple {
                    message: CREATE_FAILED_ERROR_MSG.to_owned(),
                },
            )
                .into_response()
        }
    }
}
