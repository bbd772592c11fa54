//! Dashboard HTTP handler and view rendering.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, Session, endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    transaction::{Totals, Transaction, TransactionState, totals, totals_view, transactions_list_view},
};

/// The number of transactions shown under "Recent Transactions".
const RECENT_TRANSACTION_COUNT: usize = 5;

/// Display the dashboard with the user's totals and latest transactions.
pub async fn get_dashboard_page(
    State(state): State<TransactionState>,
    session: Session,
) -> Result<Response, Error> {
    let transactions = state
        .transaction_store
        .list(&session)
        .inspect_err(|error| tracing::error!("Could not get transactions: {error}"))?;

    let recent = &transactions[..transactions.len().min(RECENT_TRANSACTION_COUNT)];

    Ok(dashboard_view(&totals(&transactions), recent, transactions.len()).into_response())
}

fn dashboard_view(totals: &Totals, recent: &[Transaction], total_count: usize) -> Markup {
    let nav_bar = NavBar::new(endpoints::ROOT).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section
                class="w-full space-y-6 lg:max-w-5xl"
                id="dashboard-content"
                data-live-url=(endpoints::LIVE_TRANSACTIONS)
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Dashboard" }
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            "Your income and expenses at a glance"
                        }
                    }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Add Transaction"
                    }
                }

                (totals_view(totals))

                section class="space-y-3" data-recent-transactions="true"
                {
                    div class="flex justify-between items-end"
                    {
                        h2 class="text-lg font-semibold" { "Recent Transactions" }

                        @if total_count > recent.len() {
                            a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE)
                            {
                                "View all " (total_count)
                            }
                        }
                    }

                    div class="rounded bg-gray-50 dark:bg-gray-800 overflow-hidden"
                    {
                        (transactions_list_view(
                            recent,
                            "No transactions yet. Add your first one to get started.",
                        ))
                    }
                }
            }
        }
    );

    base("Dashboard", &[], &content)
}
