//! An in-process stand-in for the expense REST backend.
//!
//! Like the real backend, it ignores the `category` and `month` query
//! parameters and always lists every expense.

use std::{
    future::IntoFuture,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use time::{Date, macros::date};

use crate::{
    ApiClient, AppState, MonthScope,
    expense::{Category, ExpenseRecord},
};

pub(crate) const TEST_USERNAME: &str = "testuser";
pub(crate) const TEST_PASSWORD: &str = "testpassword";
pub(crate) const TEST_ACCESS_TOKEN: &str = "test-access-token";
pub(crate) const TEST_REFRESH_TOKEN: &str = "test-refresh-token";

#[derive(Debug)]
struct FakeState {
    categories: Vec<Category>,
    expenses: Vec<ExpenseRecord>,
    next_id: i64,
    last_query: Option<String>,
    logged_out_tokens: Vec<String>,
}

fn expense(
    id: i64,
    title: &str,
    category_id: i64,
    amount: f64,
    date: Date,
    description: &str,
) -> ExpenseRecord {
    ExpenseRecord {
        id,
        title: title.to_owned(),
        category_id: Some(category_id),
        amount,
        date,
        description: description.to_owned(),
    }
}

impl FakeState {
    fn seeded() -> Self {
        Self {
            categories: vec![
                Category {
                    id: 1,
                    name: "Food".to_owned(),
                },
                Category {
                    id: 2,
                    name: "Transport".to_owned(),
                },
            ],
            expenses: vec![
                expense(1, "Groceries", 1, 100.0, date!(2024 - 01 - 05), "Weekly shop"),
                expense(2, "Taxi", 2, 50.0, date!(2024 - 01 - 20), ""),
                expense(3, "Dinner", 1, 25.5, date!(2023 - 12 - 29), ""),
            ],
            next_id: 4,
            last_query: None,
            logged_out_tokens: Vec::new(),
        }
    }
}

type SharedState = Arc<Mutex<FakeState>>;

/// A running fake backend.
pub(crate) struct FakeBackend {
    /// The root URL, e.g. "http://127.0.0.1:41234".
    pub url: String,
    state: SharedState,
}

impl FakeBackend {
    /// The expenses currently stored.
    pub fn expenses(&self) -> Vec<ExpenseRecord> {
        self.state.lock().unwrap().expenses.clone()
    }

    /// The raw query string of the most recent expense listing.
    pub fn last_query(&self) -> Option<String> {
        self.state.lock().unwrap().last_query.clone()
    }

    /// The refresh tokens sent to the log-out route.
    pub fn logged_out_tokens(&self) -> Vec<String> {
        self.state.lock().unwrap().logged_out_tokens.clone()
    }
}

/// Start a fake backend on a random local port.
pub(crate) async fn spawn_fake_backend() -> FakeBackend {
    let state: SharedState = Arc::new(Mutex::new(FakeState::seeded()));

    let app = Router::new()
        .route("/api/categories/", get(list_categories))
        .route("/api/expenses/", get(list_expenses).post(create_expense))
        .route("/api/expenses/{expense_id}/", delete(delete_expense))
        .route("/api/login/", post(log_in))
        .route("/api/register/", post(register))
        .route("/logout/", post(log_out))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind fake backend");
    let address = listener
        .local_addr()
        .expect("Could not get fake backend address");

    tokio::spawn(axum::serve(listener, app).into_future());

    FakeBackend {
        url: format!("http://{address}"),
        state,
    }
}

/// App state that talks to `backend`.
pub(crate) fn test_app_state(backend: &FakeBackend) -> AppState {
    let api = ApiClient::new(&backend.url, Duration::from_secs(5))
        .expect("Could not create API client");

    test_app_state_with_api(api)
}

/// App state that talks to the backend behind `api`.
pub(crate) fn test_app_state_with_api(api: ApiClient) -> AppState {
    AppState::new("foobar", "Etc/UTC", MonthScope::default(), api)
}

fn is_authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TEST_ACCESS_TOKEN}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Given token not valid for any token type"})),
    )
        .into_response()
}

// Decimal fields are sent as strings, the way the real backend does.
fn expense_json(expense: &ExpenseRecord) -> Value {
    json!({
        "id": expense.id,
        "user": 1,
        "title": expense.title,
        "category": expense.category_id,
        "amount": format!("{:.2}", expense.amount),
        "description": expense.description,
        "date": expense.date.to_string(),
    })
}

async fn list_categories(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }

    let state = state.lock().unwrap();
    Json(json!(state.categories)).into_response()
}

async fn list_expenses(
    State(state): State<SharedState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }

    let mut state = state.lock().unwrap();
    state.last_query = query;

    let mut expenses = state.expenses.clone();
    expenses.sort_by(|a, b| b.date.cmp(&a.date));
    let expenses: Vec<Value> = expenses.iter().map(expense_json).collect();

    Json(Value::Array(expenses)).into_response()
}

#[derive(Deserialize)]
struct NewExpenseBody {
    #[serde(default)]
    title: String,
    category: i64,
    amount: f64,
    date: Date,
    #[serde(default)]
    description: String,
}

async fn create_expense(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<NewExpenseBody>,
) -> Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }

    let mut state = state.lock().unwrap();

    if !state
        .categories
        .iter()
        .any(|category| category.id == body.category)
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Invalid category."})),
        )
            .into_response();
    }

    let expense = ExpenseRecord {
        id: state.next_id,
        title: body.title,
        category_id: Some(body.category),
        amount: body.amount,
        date: body.date,
        description: body.description,
    };
    state.next_id += 1;
    state.expenses.push(expense.clone());

    (StatusCode::CREATED, Json(expense_json(&expense))).into_response()
}

async fn delete_expense(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(expense_id): Path<i64>,
) -> Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }

    let mut state = state.lock().unwrap();
    let count_before = state.expenses.len();
    state.expenses.retain(|expense| expense.id != expense_id);

    if state.expenses.len() == count_before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "No Expense matches the given query."})),
        )
            .into_response();
    }

    StatusCode::NO_CONTENT.into_response()
}

#[derive(Deserialize)]
struct LogInBody {
    username: String,
    password: String,
}

async fn log_in(Json(body): Json<LogInBody>) -> Response {
    if body.username != TEST_USERNAME || body.password != TEST_PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
            .into_response();
    }

    Json(json!({"access": TEST_ACCESS_TOKEN, "refresh": TEST_REFRESH_TOKEN})).into_response()
}

#[derive(Deserialize)]
struct RegisterBody {
    username: String,
    email: String,
}

async fn register(Json(body): Json<RegisterBody>) -> Response {
    if body.username == TEST_USERNAME {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"username": ["A user with that username already exists."]})),
        )
            .into_response();
    }

    (
        StatusCode::CREATED,
        Json(json!({"id": 2, "username": body.username, "email": body.email})),
    )
        .into_response()
}

#[derive(Deserialize)]
struct LogOutBody {
    refresh: String,
}

async fn log_out(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<LogOutBody>,
) -> Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }

    state.lock().unwrap().logged_out_tokens.push(body.refresh);

    StatusCode::RESET_CONTENT.into_response()
}
