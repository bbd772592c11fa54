//! The transactions page: totals, the filter form and the filtered list.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, Session, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
    transaction::{
        aggregation::{Totals, category_list, totals},
        core::Transaction,
        filter::{CategoryFilter, FilterQuery, FilterSpec, KindFilter, filter_transactions},
        form::TransactionState,
        view::{totals_view, transactions_list_view},
    },
};

/// Render the transactions page.
///
/// The totals always cover every transaction, the list only shows those
/// matching the filters in the query string.
pub async fn get_transactions_page(
    State(state): State<TransactionState>,
    session: Session,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let transactions = state
        .transaction_store
        .list(&session)
        .inspect_err(|error| tracing::error!("Could not list transactions: {error}"))?;

    let spec = FilterSpec::from(query);
    let filtered = filter_transactions(&transactions, &spec);
    let category_names = category_list(&transactions);

    Ok(transactions_view(
        &totals(&transactions),
        &spec,
        &category_names,
        &filtered,
        transactions.len(),
    )
    .into_response())
}

/// The export link for the transactions currently shown.
pub(super) fn export_url(spec: &FilterSpec) -> String {
    if spec.is_empty() {
        endpoints::EXPORT_TRANSACTIONS.to_owned()
    } else {
        format!("{}?{}", endpoints::EXPORT_TRANSACTIONS, spec.to_query_string())
    }
}

fn transactions_view(
    totals: &Totals,
    spec: &FilterSpec,
    category_names: &[String],
    filtered: &[Transaction],
    total_count: usize,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let empty_message = if total_count == 0 {
        "No transactions yet."
    } else {
        "No transactions match your filters."
    };

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section
                class="w-full space-y-4 lg:max-w-5xl"
                id="transactions-content"
                data-live-url=(endpoints::LIVE_TRANSACTIONS)
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Transactions" }
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            "View and manage all your financial transactions"
                        }
                    }

                    div class="flex items-center gap-6"
                    {
                        a href=(export_url(spec)) class=(LINK_STYLE) data-export-link="true"
                        {
                            "Export CSV"
                        }

                        a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                        {
                            "Add Transaction"
                        }
                    }
                }

                (totals_view(totals))

                (filter_form_view(spec, category_names))

                p class="text-sm text-gray-500 dark:text-gray-400" data-result-count="true"
                {
                    "Showing " (filtered.len()) " of " (total_count) " transactions"
                }

                section class="rounded bg-gray-50 dark:bg-gray-800 overflow-hidden"
                {
                    (transactions_list_view(filtered, empty_message))
                }
            }
        }
    };

    base("Transactions", &[], &content)
}

fn filter_form_view(spec: &FilterSpec, category_names: &[String]) -> Markup {
    let selected_category = match &spec.category {
        CategoryFilter::All => None,
        CategoryFilter::Named(name) => Some(name.as_str()),
    };
    // Keep a filter on a category that no longer has transactions selectable.
    let missing_category =
        selected_category.filter(|name| !category_names.iter().any(|known| known == name));

    html! {
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class={ (CARD_STYLE) " w-full" }
            data-filter-form="true"
        {
            h2 class="font-semibold mb-3" { "Filters" }

            div class="grid grid-cols-1 md:grid-cols-12 gap-3 items-end"
            {
                div class="md:col-span-5"
                {
                    label for="search" class=(FORM_LABEL_STYLE) { "Search" }
                    input
                        id="search"
                        name="search"
                        type="search"
                        placeholder="Search transactions..."
                        value=(spec.search)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="md:col-span-2"
                {
                    label for="type" class=(FORM_LABEL_STYLE) { "Type" }
                    select id="type" name="type" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for (kind, label) in [
                            (KindFilter::All, "All Types"),
                            (KindFilter::Income, "Income"),
                            (KindFilter::Expense, "Expense"),
                        ] {
                            option value=(kind.as_query_value()) selected[spec.kind == kind]
                            {
                                (label)
                            }
                        }
                    }
                }

                div class="md:col-span-3"
                {
                    label for="category-filter" class=(FORM_LABEL_STYLE) { "Category" }
                    select id="category-filter" name="category" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="all" selected[selected_category.is_none()]
                        {
                            "All Categories"
                        }

                        @for name in category_names {
                            option value=(name) selected[selected_category == Some(name.as_str())]
                            {
                                (name)
                            }
                        }

                        @if let Some(name) = missing_category {
                            option value=(name) selected { (name) }
                        }
                    }
                }

                div class="md:col-span-2 flex items-center gap-3"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
                    a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Clear" }
                }
            }
        }
    }
}

#[cfg(test)]
mod transactions_page_tests {
    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use scraper::{Html, Selector};

    use crate::{
        Session, UserID, endpoints,
        test_utils::{assert_valid_html, parse_html_document, test_transaction_state},
        transaction::{
            core::{NewTransaction, TransactionKind},
            filter::{FilterQuery, FilterSpec, KindFilter},
            form::TransactionState,
            get_transactions_page,
        },
    };

    use super::export_url;

    fn session() -> Session {
        Session::authenticated(UserID::new(1))
    }

    fn add(state: &TransactionState, kind: TransactionKind, amount: &str, category: &str) {
        add_on(state, kind, amount, category, "2024-01-02");
    }

    fn add_on(
        state: &TransactionState,
        kind: TransactionKind,
        amount: &str,
        category: &str,
        date: &str,
    ) {
        state
            .transaction_store
            .add(
                &session(),
                NewTransaction {
                    kind,
                    amount: amount.to_owned(),
                    category: category.to_owned(),
                    date: Some(date.to_owned()),
                    description: Some(format!("{category} transaction")),
                },
            )
            .unwrap();
    }

    async fn render(state: TransactionState, query: FilterQuery) -> Html {
        let response = get_transactions_page(State(state), session(), Query(query))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        html
    }

    #[track_caller]
    fn row_count(html: &Html) -> usize {
        html.select(&Selector::parse("tr[data-transaction-row]").unwrap())
            .count()
    }

    #[track_caller]
    fn text_of(html: &Html, selector: &str) -> String {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("Nothing matches {selector}"))
            .text()
            .collect()
    }

    #[tokio::test]
    async fn shows_all_transactions_without_filters() {
        let state = test_transaction_state();
        add(&state, TransactionKind::Income, "1000", "Salary");
        add(&state, TransactionKind::Expense, "250.5", "Food");

        let html = render(state, FilterQuery::default()).await;

        assert_eq!(row_count(&html), 2);
        assert_eq!(
            text_of(&html, "[data-result-count]"),
            "Showing 2 of 2 transactions"
        );
    }

    #[tokio::test]
    async fn filters_by_type_but_totals_cover_everything() {
        let state = test_transaction_state();
        add(&state, TransactionKind::Income, "1000", "Salary");
        add(&state, TransactionKind::Expense, "250.5", "Food");

        let html = render(
            state,
            FilterQuery {
                kind: Some("expense".to_owned()),
                ..Default::default()
            },
        )
        .await;

        assert_eq!(row_count(&html), 1);
        assert!(text_of(&html, "[data-total='net']").ends_with("749.50"));
        assert_eq!(
            text_of(&html, "select[name=type] option[selected]"),
            "Expense"
        );
    }

    #[tokio::test]
    async fn filter_form_lists_categories_in_first_seen_order() {
        let state = test_transaction_state();
        add_on(&state, TransactionKind::Expense, "5", "Food", "2024-01-01");
        add_on(&state, TransactionKind::Income, "10", "Salary", "2024-02-01");

        let html = render(state, FilterQuery::default()).await;

        let options = html
            .select(&Selector::parse("select[name=category] option").unwrap())
            .filter_map(|option| option.value().attr("value"))
            .collect::<Vec<_>>();
        // Transactions are listed newest first.
        assert_eq!(options, vec!["all", "Salary", "Food"]);
    }

    #[tokio::test]
    async fn no_matches_shows_message() {
        let state = test_transaction_state();
        add(&state, TransactionKind::Expense, "5", "Food");

        let html = render(
            state,
            FilterQuery {
                search: Some("rent".to_owned()),
                ..Default::default()
            },
        )
        .await;

        assert_eq!(row_count(&html), 0);
        assert_eq!(
            text_of(&html, "td[data-empty-state]"),
            "No transactions match your filters."
        );
    }

    #[tokio::test]
    async fn empty_store_shows_no_transactions_yet() {
        let html = render(test_transaction_state(), FilterQuery::default()).await;

        assert_eq!(text_of(&html, "td[data-empty-state]"), "No transactions yet.");
    }

    #[tokio::test]
    async fn export_link_keeps_filters() {
        let state = test_transaction_state();

        let html = render(
            state,
            FilterQuery {
                kind: Some("income".to_owned()),
                ..Default::default()
            },
        )
        .await;

        let href = html
            .select(&Selector::parse("a[data-export-link]").unwrap())
            .next()
            .and_then(|link| link.value().attr("href"))
            .expect("No export link");
        assert_eq!(
            href,
            format!(
                "{}?search=&type=income&category=all",
                endpoints::EXPORT_TRANSACTIONS
            )
        );
    }

    #[test]
    fn export_url_without_filters_has_no_query() {
        assert_eq!(
            export_url(&FilterSpec::default()),
            endpoints::EXPORT_TRANSACTIONS
        );
        assert!(
            export_url(&FilterSpec {
                kind: KindFilter::Expense,
                ..Default::default()
            })
            .ends_with("type=expense&category=all")
        );
    }
}
