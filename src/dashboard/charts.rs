//! Chart generation and rendering for the dashboard.
//!
//! This module creates ECharts visualizations of the aggregated expenses:
//! - **Monthly Expenses Chart**: Bar chart of January to December of the reference year
//! - **Weekly Expenses Chart**: Line chart of the four week-of-month buckets
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a container and an inline script. The script is part of the
//! dashboard content so the charts are drawn again whenever htmx swaps it in.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::{Bar, Line},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::AggregationResult,
    html::{CURRENCY, HeadElement},
};

/// The ECharts build loaded on the dashboard page.
const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const WEEK_LABELS: [&str; 4] = ["Week 1", "Week 2", "Week 3", "Week 4"];

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Builds the monthly and weekly charts for `result`.
pub(super) fn build_dashboard_charts(result: &AggregationResult) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "monthly-chart",
            options: monthly_chart(&result.monthly_series).to_string(),
        },
        DashboardChart {
            id: "weekly-chart",
            options: weekly_chart(&result.weekly_series).to_string(),
        },
    ]
}

/// The script tag that loads ECharts, for the page head.
pub(super) fn echarts_script() -> HeadElement {
    HeadElement::ScriptLink(ECHARTS_URL.to_owned())
}

/// Renders the chart containers followed by the script that draws them.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-8"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }

            script { (charts_script(charts)) }
        }
    )
}

fn charts_script(charts: &[DashboardChart]) -> PreEscaped<String> {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom || typeof echarts === 'undefined') {{ return; }}
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    PreEscaped(script_content)
}

pub(super) fn monthly_chart(monthly_series: &[f64; 12]) -> Chart {
    Chart::new()
        .title(
            Title::new()
                .text("Monthly Expenses")
                .subtext("This year"),
        )
        .tooltip(currency_tooltip())
        .grid(default_grid())
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(MONTH_LABELS.to_vec()),
        )
        .y_axis(amount_axis())
        .series(Bar::new().name("Expenses").data(monthly_series.to_vec()))
}

pub(super) fn weekly_chart(weekly_series: &[f64; 4]) -> Chart {
    Chart::new()
        .title(
            Title::new()
                .text("Weekly Expenses")
                .subtext("By week of the month"),
        )
        .tooltip(currency_tooltip())
        .grid(default_grid())
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(WEEK_LABELS.to_vec()),
        )
        .y_axis(amount_axis())
        .series(Line::new().name("Expenses").data(weekly_series.to_vec()))
}

fn default_grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .contain_label(true)
}

fn amount_axis() -> Axis {
    Axis::new()
        .type_(AxisType::Value)
        .name(format!("Amount ({CURRENCY})"))
        .axis_label(AxisLabel::new().formatter(currency_formatter()))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        &format!(
            "const currencyFormatter = new Intl.NumberFormat('en-US', {{
              style: 'currency',
              currency: '{CURRENCY}'
            }});
            return (number) ? currencyFormatter.format(number) : \"-\";"
        ),
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
