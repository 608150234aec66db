//! Expense Tracker is a web client for an expense-tracking REST API.
//!
//! The client serves HTML pages for logging in, registering, adding expenses
//! and a dashboard that summarises the user's expenses. All data lives in the
//! REST backend; this crate fetches it on the user's behalf and aggregates it
//! for display.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod api;
mod app_state;
mod auth;
mod config;
mod dashboard;
mod endpoints;
mod error;
mod expense;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod timezone;
mod year_month;

#[cfg(test)]
mod test_utils;

pub use api::{ApiClient, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT};
pub use app_state::AppState;
pub use config::MonthScope;
pub use dashboard::{
    AggregationOptions, AggregationResult, CategoryFilter, FilterState, MonthFilter, aggregate,
    select_records,
};
pub use error::Error;
pub use expense::{Category, CategoryId, ExpenseId, ExpenseRecord, OTHER_CATEGORY_LABEL};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use year_month::YearMonth;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
