//! Defines the endpoint for deleting an expense.

use axum::{
    Extension,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    alert::Alert,
    auth::AccessToken,
    dashboard::{
        DashboardState, FilterQuery, FilterState, dashboard_content_view, load_dashboard,
    },
    expense::ExpenseId,
};

/// A route handler for deleting an expense.
///
/// Responds with the dashboard content for the current filters, fetched again
/// after the deletion, and a success alert. The status code has to be 200 OK
/// or htmx will not swap the content.
pub async fn delete_expense_endpoint(
    State(state): State<DashboardState>,
    Extension(token): Extension<AccessToken>,
    Path(expense_id): Path<ExpenseId>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let filter = match FilterState::from_query(&query) {
        Ok(filter) => filter,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = state.api.delete_expense(&token, expense_id).await {
        tracing::error!("Could not delete expense {expense_id}: {error}");
        return error.into_alert_response();
    }

    tracing::info!("Deleted expense {expense_id}");

    match load_dashboard(&state, &token, filter).await {
        Ok(data) => html! {
            (dashboard_content_view(&data))
            (Alert::SuccessSimple { message: "Expense deleted".to_owned() }.into_markup())
        }
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{Path, Query, State},
        http::StatusCode,
    };

    use time::macros::date;

    use crate::{
        AggregationOptions, AggregationResult, MonthScope, aggregate,
        auth::AccessToken,
        dashboard::{DashboardState, FilterQuery},
        endpoints,
        test_utils::{
            FakeBackend, TEST_ACCESS_TOKEN, assert_hx_redirect, parse_html_fragment, select_text,
            spawn_fake_backend, test_app_state,
        },
    };

    use super::delete_expense_endpoint;

    async fn delete_state() -> (FakeBackend, DashboardState) {
        let backend = spawn_fake_backend().await;
        let app_state = test_app_state(&backend);
        let state = DashboardState {
            local_timezone: app_state.local_timezone,
            month_scope: MonthScope::default(),
            api: app_state.api,
        };

        (backend, state)
    }

    fn token() -> Extension<AccessToken> {
        Extension(AccessToken::new(TEST_ACCESS_TOKEN))
    }

    fn no_filters() -> Query<FilterQuery> {
        Query(FilterQuery::default())
    }

    fn summarise(backend: &FakeBackend) -> AggregationResult {
        aggregate(
            &backend.expenses(),
            &[],
            date!(2024 - 01 - 31),
            AggregationOptions::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn deletes_expense_and_refreshes_dashboard() {
        let (backend, state) = delete_state().await;
        let before = summarise(&backend);

        let response = delete_expense_endpoint(State(state), token(), Path(1), no_filters()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(backend.expenses().iter().all(|expense| expense.id != 1));

        let html = parse_html_fragment(response).await;
        assert_eq!(select_text(&html, ".expense-card").len(), 2);
        assert_eq!(
            select_text(&html, "[data-summary='Total Spending']"),
            vec!["NPR 75.50"]
        );
        assert_eq!(
            select_text(&html, "#alert-container p.font-medium"),
            vec!["Expense deleted"]
        );

        let after = summarise(&backend);
        assert_eq!(before.total - after.total, 100.0);
        assert_eq!(before.monthly_series[0] - after.monthly_series[0], 100.0);
        assert_eq!(before.weekly_series[0] - after.weekly_series[0], 100.0);
        assert_eq!(after.monthly_series[0], 50.0);
        assert_eq!(after.weekly_series[0], 0.0);
    }

    #[tokio::test]
    async fn refreshed_dashboard_keeps_filters() {
        let (_backend, state) = delete_state().await;
        let filters = Query(FilterQuery {
            category: Some("1".to_owned()),
            month: None,
        });

        let response = delete_expense_endpoint(State(state), token(), Path(3), filters).await;

        let html = parse_html_fragment(response).await;
        assert_eq!(select_text(&html, ".expense-title"), vec!["Groceries"]);
        assert_eq!(select_text(&html, "#active-filters"), vec!["Category: Food"]);
    }

    #[tokio::test]
    async fn missing_expense_returns_not_found_alert() {
        let (backend, state) = delete_state().await;

        let response =
            delete_expense_endpoint(State(state), token(), Path(999), no_filters()).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(backend.expenses().len(), 3);
    }

    #[tokio::test]
    async fn expired_token_redirects_to_log_in() {
        let (backend, state) = delete_state().await;

        let response = delete_expense_endpoint(
            State(state),
            Extension(AccessToken::new("expired")),
            Path(1),
            no_filters(),
        )
        .await;

        assert_hx_redirect(&response, endpoints::LOG_IN_VIEW);
        assert_eq!(backend.expenses().len(), 3);
    }
}
