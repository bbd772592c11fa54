//! HTTP handler for the analytics page.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, Session, endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    transaction::{Analytics, TransactionState, totals_view},
};

use super::{
    charts::{
        AnalyticsChart, category_chart, charts_script, charts_view, income_expense_chart,
        monthly_chart,
    },
    tables::{category_table, monthly_table},
};

const ECHARTS_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// Display the analytics page with charts and breakdowns of every transaction.
pub async fn get_analytics_page(
    State(state): State<TransactionState>,
    session: Session,
) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::ANALYTICS_VIEW).into_html();

    let transactions = state
        .transaction_store
        .list(&session)
        .inspect_err(|error| tracing::error!("Could not get transactions: {error}"))?;

    if transactions.is_empty() {
        return Ok(analytics_no_data_view(nav_bar).into_response());
    }

    let analytics = Analytics::new(&transactions);
    let charts = [
        AnalyticsChart {
            id: "monthly-chart",
            options: monthly_chart(&analytics.months).to_string(),
        },
        AnalyticsChart {
            id: "income-expense-chart",
            options: income_expense_chart(&analytics.totals).to_string(),
        },
        AnalyticsChart {
            id: "category-chart",
            options: category_chart(&analytics.categories).to_string(),
        },
    ];

    Ok(analytics_view(nav_bar, &analytics, &charts).into_response())
}

fn analytics_view(nav_bar: Markup, analytics: &Analytics, charts: &[AnalyticsChart]) -> Markup {
    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(charts),
    ];

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section
                class="w-full space-y-6 lg:max-w-6xl"
                data-live-url=(endpoints::LIVE_TRANSACTIONS)
            {
                header
                {
                    h1 class="text-xl font-bold" { "Analytics" }
                    p class="text-sm text-gray-500 dark:text-gray-400" data-category-count
                    {
                        (analytics.category_names.len()) " categories across "
                        (analytics.months.len()) " months"
                    }
                }

                (totals_view(&analytics.totals))

                (charts_view(charts))

                div class="grid grid-cols-1 xl:grid-cols-2 gap-6"
                {
                    (monthly_table(&analytics.months))
                    (category_table(&analytics.categories))
                }
            }
        }
    );

    base("Analytics", &scripts, &content)
}

fn analytics_no_data_view(nav_bar: Markup) -> Markup {
    let new_transaction_link = endpoints::NEW_TRANSACTION_VIEW;

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section
                class="space-y-4 w-full lg:max-w-5xl"
                data-live-url=(endpoints::LIVE_TRANSACTIONS)
            {
                h1 class="text-xl font-bold" { "Analytics" }

                p data-empty-state { "Nothing here yet..." }

                p
                {
                    "Charts will show up here once you "
                    (link(new_transaction_link, "add a transaction"))
                    "."
                }
            }
        }
    );

    base("Analytics", &[], &content)
}
