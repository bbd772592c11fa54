//! Chart generation and rendering for the analytics page.
//!
//! This module creates interactive ECharts visualizations for the breakdowns:
//! - **Monthly Trend**: income and expenses per calendar month
//! - **Income vs Expense**: the split of all money in and out
//! - **Categories**: income and expenses per category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a matching HTML container and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, Emphasis, EmphasisFocus,
        JsFunction, Tooltip, Trigger,
    },
    series::{bar::Bar, pie::Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    html::HeadElement,
    transaction::{CategorySummary, MonthSummary, Totals},
};

const INCOME_COLOR: &str = "#14b8a6";
const EXPENSE_COLOR: &str = "#f87171";

/// An analytics chart with its HTML container ID and ECharts configuration.
pub(super) struct AnalyticsChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for the charts.
pub(super) fn charts_view(charts: &[AnalyticsChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        data-chart="true"
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for the charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[AnalyticsChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
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

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Income and expenses side by side for each month, in the order the months first appear.
pub(super) fn monthly_chart(months: &[MonthSummary]) -> Chart {
    let labels = months
        .iter()
        .map(|month| month.label.clone())
        .collect::<Vec<_>>();
    let income = months.iter().map(|month| month.income).collect::<Vec<_>>();
    let expense = months.iter().map(|month| month.expense).collect::<Vec<_>>();

    income_expense_bars(
        Chart::new().title(Title::new().text("Monthly Trend")),
        labels,
        income,
        expense,
    )
}

pub(super) fn income_expense_chart(totals: &Totals) -> Chart {
    Chart::new()
        .title(Title::new().text("Income vs Expense"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("0"))
        .color(vec![Color::from(INCOME_COLOR), Color::from(EXPENSE_COLOR)])
        .series(
            Pie::new()
                .name("Income vs Expense")
                .radius(vec!["40%", "70%"])
                .data(vec![(totals.income, "Income"), (totals.expense, "Expense")]),
        )
}

/// Income and expenses side by side for each category, in the order the categories first appear.
pub(super) fn category_chart(categories: &[CategorySummary]) -> Chart {
    let labels = categories
        .iter()
        .map(|category| category.name.clone())
        .collect::<Vec<_>>();
    let income = categories
        .iter()
        .map(|category| category.income)
        .collect::<Vec<_>>();
    let expense = categories
        .iter()
        .map(|category| category.expense)
        .collect::<Vec<_>>();

    income_expense_bars(
        Chart::new().title(Title::new().text("Categories")),
        labels,
        income,
        expense,
    )
}

fn income_expense_bars(
    chart: Chart,
    labels: Vec<String>,
    income: Vec<f64>,
    expense: Vec<f64>,
) -> Chart {
    chart
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("1%").right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(60)
                .contain_label(true),
        )
        .color(vec![Color::from(INCOME_COLOR), Color::from(EXPENSE_COLOR)])
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Bar::new()
                .name("Income")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(income),
        )
        .series(
            Bar::new()
                .name("Expense")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(expense),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
