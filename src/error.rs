//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    alert::Alert, endpoints, expense::ExpenseId, internal_server_error::InternalServerError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request to the REST backend could not be completed, e.g. the
    /// connection was refused or timed out.
    #[error("could not reach the expense API: {0}")]
    Network(String),

    /// The REST backend responded with a non-success status code.
    ///
    /// `detail` holds the message from the backend's `{"detail": ...}` body
    /// when one was provided.
    #[error("the expense API responded with status {status}: {detail:?}")]
    UnexpectedStatus {
        /// The HTTP status code of the response.
        status: u16,
        /// The error message from the response body, if any.
        detail: Option<String>,
    },

    /// The access token is missing, or the backend rejected it as expired
    /// or invalid. The user needs to log in again.
    #[error("the access token is missing or has expired")]
    Unauthorized,

    /// A form was submitted with missing or invalid fields.
    ///
    /// The string is shown to the user as is.
    #[error("{0}")]
    Validation(String),

    /// An expense amount could not be used for aggregation, e.g. it was not a
    /// number, or it was NaN or infinite.
    #[error("invalid amount for expense {expense_id}: {amount}")]
    InvalidInput {
        /// The ID of the offending expense.
        expense_id: ExpenseId,
        /// The amount as it was received.
        amount: String,
    },

    /// A dashboard filter parameter did not have the expected type.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// The backend rejected the log-in request.
    ///
    /// The string is the reason given by the backend, suitable for display.
    #[error("{0}")]
    LogInRejected(String),

    /// The backend rejected the registration request.
    ///
    /// The string is the reason given by the backend, suitable for display.
    #[error("{0}")]
    RegistrationRejected(String),

    /// The configured base URL for the REST backend is not a valid URL.
    #[error("invalid API URL \"{0}\"")]
    InvalidApiUrl(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Tried to delete an expense that the backend does not have.
    #[error("tried to delete an expense that does not exist")]
    DeleteMissingExpense,
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(reqwest::StatusCode::UNAUTHORIZED) => Error::Unauthorized,
            Some(status) => Error::UnexpectedStatus {
                status: status.as_u16(),
                detail: None,
            },
            None => Error::Network(error.to_string()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Unauthorized => Redirect::to(endpoints::LOG_IN_VIEW).into_response(),
            Error::Network(_) => InternalServerError {
                description: "Could not load your expenses",
                fix: "The expense service could not be reached. Please refresh the page.",
            }
            .into_response(),
            Error::InvalidFilter(message) => (
                StatusCode::BAD_REQUEST,
                InternalServerError {
                    description: "Invalid filter",
                    fix: &message,
                }
                .into_html(),
            )
                .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    ///
    /// An [Error::Unauthorized] error becomes an HTMX redirect to the log-in page instead.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Unauthorized => {
                return (
                    HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
                    StatusCode::OK,
                )
                    .into_response();
            }
            Error::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple { message },
            ),
            Error::InvalidFilter(message) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Failed to apply filters".to_owned(),
                    details: message,
                },
            ),
            Error::Network(_) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "Failed to load data".to_owned(),
                    details: "The expense service could not be reached. Please try again."
                        .to_owned(),
                },
            ),
            Error::UnexpectedStatus {
                detail: Some(detail),
                ..
            } => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "The request failed".to_owned(),
                    details: detail,
                },
            ),
            Error::InvalidInput { expense_id, amount } => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "Could not summarise your expenses".to_owned(),
                    details: format!("Expense {expense_id} has an invalid amount \"{amount}\"."),
                },
            ),
            Error::DeleteMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Failed to delete expense".to_owned(),
                    details: "The expense could not be found. \
                    Try refreshing the page to see if the expense has already been deleted."
                        .to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
