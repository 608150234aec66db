//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for displaying the dashboard and applying or resetting filters
//! - HTML view functions for the filter form and the dashboard content
//! - The state and data types shared with the delete expense endpoint

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    ApiClient, AppState, Error, MonthScope,
    auth::AccessToken,
    dashboard::{
        AggregationOptions, AggregationResult, CategoryFilter, FilterQuery, FilterState,
        MonthFilter, aggregate,
        cards::{
            DASHBOARD_CONTENT_ID, FILTER_FORM_ID, expense_cards_view, summary_cards_view,
        },
        charts::{build_dashboard_charts, charts_view, echarts_script},
        filter::ALL,
        select_records,
    },
    endpoints,
    expense::{Category, ExpenseRecord, category_name},
    html::{BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base},
    navigation::NavBar,
    timezone::local_today,
    year_month::YearMonth,
};

/// How many months the month filter offers, counting back from the current month.
const MONTH_OPTION_COUNT: usize = 12;

const NO_FILTERS_TEXT: &str = "No filters applied";

/// The state needed for displaying the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kathmandu".
    pub local_timezone: String,
    /// Which expenses count as "this month".
    pub month_scope: MonthScope,
    /// The client for the REST backend that stores the expenses.
    pub api: ApiClient,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            month_scope: state.month_scope,
            api: state.api.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
pub(crate) struct DashboardData {
    categories: Vec<Category>,
    records: Vec<ExpenseRecord>,
    result: AggregationResult,
    filter: FilterState,
    today: Date,
}

/// Fetches the categories and expenses for `filter` and aggregates the selection.
///
/// The backend is sent the filter as query parameters, but the selection is
/// applied here as well since the backend is free to ignore them.
///
/// # Errors
/// Returns an error if the timezone is invalid, the backend cannot be reached or
/// rejects the request, or an expense has an invalid amount.
pub(crate) async fn load_dashboard(
    state: &DashboardState,
    token: &AccessToken,
    filter: FilterState,
) -> Result<DashboardData, Error> {
    let today = local_today(&state.local_timezone).inspect_err(|error| {
        tracing::error!("Could not get today's date: {error}");
    })?;

    let (categories, records) = tokio::try_join!(
        state.api.fetch_categories(token),
        state.api.fetch_expenses(token, &filter)
    )
    .inspect_err(|error| tracing::error!("Could not load dashboard data: {error}"))?;

    let records = select_records(records, &filter);
    let options = AggregationOptions {
        month_scope: state.month_scope,
    };
    let result = aggregate(&records, &categories, today, options)
        .inspect_err(|error| tracing::error!("Could not aggregate expenses: {error}"))?;

    Ok(DashboardData {
        categories,
        records,
        result,
        filter,
        today,
    })
}

/// Display the dashboard page with the filters given in the query string.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(token): Extension<AccessToken>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let filter = FilterState::from_query(&query)?;
    let data = load_dashboard(&state, &token, filter).await?;

    Ok(dashboard_view(&data).into_response())
}

/// Render the dashboard content for the filters in the query string.
///
/// Used by the filter form whenever a select changes.
pub async fn get_dashboard_content(
    State(state): State<DashboardState>,
    Extension(token): Extension<AccessToken>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let filter = match FilterState::from_query(&query) {
        Ok(filter) => filter,
        Err(error) => {
            tracing::warn!("Rejected dashboard filters: {error}");
            return error.into_alert_response();
        }
    };

    match load_dashboard(&state, &token, filter).await {
        Ok(data) => dashboard_content_view(&data).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Clear the filters and render the dashboard content.
///
/// The filter form is swapped out-of-band so its selects show the reset values.
pub async fn reset_dashboard(
    State(state): State<DashboardState>,
    Extension(token): Extension<AccessToken>,
) -> Response {
    match load_dashboard(&state, &token, FilterState::default()).await {
        Ok(data) => html! {
            (dashboard_content_view(&data))
            (filter_form(&data.categories, &data.filter, data.today, true))
        }
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Describes the active filters, e.g. "Category: Food Month: January 2024".
fn active_filter_text(filter: &FilterState, categories: &[Category]) -> String {
    if filter.is_default() {
        return NO_FILTERS_TEXT.to_owned();
    }

    let mut parts = Vec::new();

    if let CategoryFilter::Category(id) = filter.category {
        parts.push(format!("Category: {}", category_name(categories, Some(id))));
    }

    if let MonthFilter::Month(year_month) = filter.month {
        parts.push(format!("Month: {}", year_month.label()));
    }

    parts.join(" ")
}

/// The months offered by the month filter, newest first.
///
/// A selected month outside the offered range is inserted in order so it stays selected.
fn month_options(today: Date, selected: MonthFilter) -> Vec<YearMonth> {
    let mut months = YearMonth::recent(YearMonth::from_date(today), MONTH_OPTION_COUNT);

    if let MonthFilter::Month(year_month) = selected {
        if !months.contains(&year_month) {
            let index = months
                .iter()
                .position(|month| *month < year_month)
                .unwrap_or(months.len());
            months.insert(index, year_month);
        }
    }

    months
}

fn filter_form(
    categories: &[Category],
    filter: &FilterState,
    today: Date,
    swap_out_of_band: bool,
) -> Markup {
    let content_target = format!("#{DASHBOARD_CONTENT_ID}");

    html! {
        form
            id=(FILTER_FORM_ID)
            hx-get=(endpoints::DASHBOARD_API)
            hx-trigger="change"
            hx-target=(content_target)
            hx-target-error="#alert-container"
            hx-swap="outerHTML"
            hx-sync="this:replace"
            hx-swap-oob=[swap_out_of_band.then_some("true")]
            class="w-full grid grid-cols-1 md:grid-cols-3 gap-4 items-end mb-8"
        {
            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value=(ALL) selected[filter.category == CategoryFilter::All]
                    {
                        "All Categories"
                    }

                    @for category in categories {
                        option
                            value=(category.id)
                            selected[filter.category == CategoryFilter::Category(category.id)]
                        {
                            (category.name)
                        }
                    }
                }
            }

            div
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                select name="month" id="month" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value=(ALL) selected[filter.month == MonthFilter::All]
                    {
                        "All Months"
                    }

                    @for year_month in month_options(today, filter.month) {
                        option
                            value=(year_month)
                            selected[filter.month == MonthFilter::Month(year_month)]
                        {
                            (year_month.label())
                        }
                    }
                }
            }

            button
                type="button"
                id="reset-filters"
                class=(BUTTON_SECONDARY_STYLE)
                hx-get=(endpoints::DASHBOARD_RESET_API)
                hx-target=(content_target)
                hx-target-error="#alert-container"
                hx-swap="outerHTML"
                hx-disabled-elt="this"
            {
                "Reset Filters"
            }
        }
    }
}

/// Renders the part of the dashboard that changes with the filters.
pub(crate) fn dashboard_content_view(data: &DashboardData) -> Markup {
    let charts = build_dashboard_charts(&data.result);

    html! {
        div
            id=(DASHBOARD_CONTENT_ID)
            class="w-full"
        {
            p id="active-filters" class="text-sm text-gray-600 dark:text-gray-400 mb-4"
            {
                (active_filter_text(&data.filter, &data.categories))
            }

            (summary_cards_view(&data.result))
            (charts_view(&charts))
            (expense_cards_view(&data.records, &data.categories))
        }
    }
}

fn dashboard_view(data: &DashboardData) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            h2 class="w-full text-2xl font-bold mb-4" { "Dashboard" }

            (filter_form(&data.categories, &data.filter, data.today, false))
            (dashboard_content_view(data))
        }
    );

    base("Dashboard", &[echarts_script()], &content)
}
