//! The JSON bodies exchanged with the REST backend.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    expense::{CategoryId, ExpenseId, ExpenseRecord},
};

/// An amount as the backend sends it.
///
/// Decimal fields are serialized as strings such as "100.00", but plain
/// numbers are accepted too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireAmount {
    /// A JSON number.
    Number(f64),
    /// A decimal string.
    Text(String),
}

impl WireAmount {
    fn parse(&self) -> Option<f64> {
        let amount = match self {
            WireAmount::Number(amount) => *amount,
            WireAmount::Text(text) => text.trim().parse().ok()?,
        };

        amount.is_finite().then_some(amount)
    }

    fn as_text(&self) -> String {
        match self {
            WireAmount::Number(amount) => amount.to_string(),
            WireAmount::Text(text) => text.clone(),
        }
    }
}

/// An expense as listed by `GET /api/expenses/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseResponse {
    pub id: ExpenseId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryId>,
    pub amount: WireAmount,
    pub date: Date,
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<ExpenseResponse> for ExpenseRecord {
    type Error = Error;

    fn try_from(response: ExpenseResponse) -> Result<Self, Self::Error> {
        let amount = response.amount.parse().ok_or_else(|| Error::InvalidInput {
            expense_id: response.id,
            amount: response.amount.as_text(),
        })?;

        Ok(Self {
            id: response.id,
            title: response.title.unwrap_or_default(),
            category_id: response.category,
            amount,
            date: response.date,
            description: response.description.unwrap_or_default(),
        })
    }
}

/// The body for `POST /api/login/`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// The body for `POST /api/register/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// The bearer tokens issued by the backend on log-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short lived token sent with each request.
    pub access: String,
    /// Long lived token used to end the session.
    pub refresh: String,
}

/// The body for `POST /logout/`.
#[derive(Debug, Clone, Serialize)]
pub struct LogOutRequest<'a> {
    pub refresh: &'a str,
}

/// The error body the backend sends with a non-success status.
///
/// Field errors are lists of messages, keyed by the field name.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub non_field_errors: Option<Vec<String>>,
    #[serde(default)]
    pub username: Option<Vec<String>>,
    #[serde(default)]
    pub email: Option<Vec<String>>,
    #[serde(default)]
    pub password: Option<Vec<String>>,
}

impl ErrorBody {
    /// The message to show when log-in is rejected.
    pub fn log_in_message(&self) -> String {
        if let Some(detail) = &self.detail {
            return detail.clone();
        }

        match &self.non_field_errors {
            Some(errors) if !errors.is_empty() => errors.join(" "),
            _ => "Login failed".to_owned(),
        }
    }

    /// The message to show when registration is rejected.
    ///
    /// Only the first field with errors is reported.
    pub fn registration_message(&self) -> String {
        let field_errors = [
            ("Username", &self.username),
            ("Email", &self.email),
            ("Password", &self.password),
        ];

        for (field, errors) in field_errors {
            if let Some(errors) = errors {
                return format!("{field} error: {}", errors.join(" "));
            }
        }

        match &self.non_field_errors {
            Some(errors) if !errors.is_empty() => errors.join(" "),
            _ => "Registration failed".to_owned(),
        }
    }
}
