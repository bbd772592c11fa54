//! HTML fragments shared by the dashboard and the transactions page.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints,
    html::{
        CARD_STYLE, CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        edit_delete_action_links, format_currency,
    },
    transaction::{
        aggregation::Totals,
        core::{Transaction, TransactionKind},
    },
};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

const INCOME_STYLE: &str = "text-green-700 dark:text-green-300";
const EXPENSE_STYLE: &str = "text-red-700 dark:text-red-300";

/// Cards for total income, total expenses and the net balance.
pub(crate) fn totals_view(totals: &Totals) -> Markup {
    let net_style = if totals.net < 0.0 {
        EXPENSE_STYLE
    } else {
        INCOME_STYLE
    };

    html! {
        section class="grid grid-cols-1 sm:grid-cols-3 gap-4 w-full" data-totals="true"
        {
            (total_card("Total Income", totals.income, INCOME_STYLE, "income"))
            (total_card("Total Expense", totals.expense, EXPENSE_STYLE, "expense"))
            (total_card("Net Balance", totals.net, net_style, "net"))
        }
    }
}

fn total_card(title: &str, amount: f64, amount_style: &str, key: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            div class="text-sm text-gray-500 dark:text-gray-400" { (title) }
            div class={ "text-2xl font-bold tabular-nums " (amount_style) } data-total=(key)
            {
                (format_currency(amount))
            }
        }
    }
}

/// A table of transactions on large screens and a list of cards on small screens.
pub(crate) fn transactions_list_view(transactions: &[Transaction], empty_message: &str) -> Markup {
    let table_wrapper_class = "hidden lg:block";

    html! {
        div class="lg:hidden space-y-3"
        {
            @for transaction in transactions {
                (transaction_card_view(transaction))
            }

            @if transactions.is_empty() {
                div class="rounded-lg border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                {
                    (empty_message)
                }
            }
        }

        div class=(table_wrapper_class)
        {
            table class="w-full my-2 text-sm text-left rtl:text-right
                text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (transaction_row_view(transaction))
                    }

                    @if transactions.is_empty() {
                        tr
                        {
                            td
                                colspan="5"
                                data-empty-state="true"
                                class="px-6 py-4 text-center"
                            {
                                (empty_message)
                            }
                        }
                    }
                }
            }
        }
    }
}

fn transaction_row_view(transaction: &Transaction) -> Markup {
    let (amount, amount_style) = signed_amount(transaction);
    let (description, tooltip) = format_description(&transaction.description);
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, &transaction.id);
    let delete_url = endpoints::format_endpoint(endpoints::TRANSACTION, &transaction.id);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class=(TABLE_CELL_STYLE) { (category_badge(&transaction.category)) }
            td class={ "px-6 py-4 text-right tabular-nums " (amount_style) } { (amount) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        &confirm_message(transaction),
                        "closest tr",
                    ))
                }
            }
        }
    }
}

fn transaction_card_view(transaction: &Transaction) -> Markup {
    let (amount, amount_style) = signed_amount(transaction);
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, &transaction.id);
    let delete_url = endpoints::format_endpoint(endpoints::TRANSACTION, &transaction.id);

    html! {
        div class="rounded border border-gray-200 bg-white px-3 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
            data-transaction-card="true"
        {
            div class="flex items-start justify-between gap-3"
            {
                div class="min-w-0 flex-1 truncate text-sm font-medium text-gray-900 dark:text-white"
                    title=(transaction.description)
                { (transaction.description) }
                div class={ "shrink-0 text-sm font-semibold tabular-nums text-right whitespace-nowrap " (amount_style) }
                { (amount) }
            }

            div class="mt-3 flex items-center justify-between gap-3 border-t border-gray-200 pt-2 text-xs text-gray-500 dark:border-gray-700/80 dark:text-gray-400"
            {
                div class="flex items-center gap-2"
                {
                    (category_badge(&transaction.category))
                    span { (transaction.date) }
                }

                div class="flex items-center gap-4 text-sm text-gray-900 dark:text-white"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        &confirm_message(transaction),
                        "closest [data-transaction-card='true']",
                    ))
                }
            }
        }
    }
}

fn category_badge(category: &str) -> Markup {
    html! {
        @if category.is_empty() {
            span class="text-gray-400 dark:text-gray-500" { "-" }
        } @else {
            span class=(CATEGORY_BADGE_STYLE) { (category) }
        }
    }
}

fn confirm_message(transaction: &Transaction) -> String {
    format!(
        "Are you sure you want to delete the transaction '{}'? This cannot be undone.",
        transaction.description
    )
}

/// The amount with a "+" for income or a "-" for expenses, and its text colour.
fn signed_amount(transaction: &Transaction) -> (String, &'static str) {
    match transaction.kind {
        TransactionKind::Income => (
            format!("+{}", format_currency(transaction.amount)),
            INCOME_STYLE,
        ),
        TransactionKind::Expense => (
            format!("-{}", format_currency(transaction.amount)),
            EXPENSE_STYLE,
        ),
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        (truncated + "...", Some(description))
    }
}

#[cfg(test)]
mod transaction_view_tests {
    use scraper::{Html, Selector};
    use time::OffsetDateTime;

    use crate::{
        UserID,
        transaction::{
            aggregation::Totals,
            core::{Transaction, TransactionId, TransactionKind},
        },
    };

    use super::{format_description, totals_view, transactions_list_view};

    fn transaction(kind: TransactionKind, amount: f64, description: &str) -> Transaction {
        Transaction {
            id: TransactionId::generate(),
            kind,
            amount,
            category: "Food".to_owned(),
            date: "2024-01-02".to_owned(),
            description: description.to_owned(),
            owner_id: UserID::new(1),
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        }
    }

    #[test]
    fn totals_show_all_three_amounts() {
        let html = Html::parse_fragment(
            &totals_view(&Totals {
                income: 300.0,
                expense: 250.5,
                net: 49.5,
            })
            .into_string(),
        );

        for (key, want) in [("income", "300.00"), ("expense", "250.50"), ("net", "49.50")] {
            let selector = Selector::parse(&format!("[data-total='{key}']")).unwrap();
            let text = html
                .select(&selector)
                .next()
                .unwrap_or_else(|| panic!("No total for {key}"))
                .text()
                .collect::<String>();
            assert!(text.ends_with(want), "want {key} total ending in {want}, got {text}");
        }
    }

    #[test]
    fn rows_show_signed_amounts() {
        let transactions = vec![
            transaction(TransactionKind::Income, 10.0, "Refund"),
            transaction(TransactionKind::Expense, 2.5, "Coffee"),
        ];

        let html =
            Html::parse_fragment(&transactions_list_view(&transactions, "Nothing").into_string());

        let amounts = html
            .select(&Selector::parse("tr[data-transaction-row] td:nth-child(4)").unwrap())
            .map(|cell| cell.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(amounts.len(), 2);
        assert!(amounts[0].starts_with("+$"), "got {}", amounts[0]);
        assert!(amounts[1].starts_with("-$"), "got {}", amounts[1]);
    }

    #[test]
    fn empty_list_shows_message() {
        let html = Html::parse_fragment(
            &transactions_list_view(&[], "No transactions yet.").into_string(),
        );

        let cell = html
            .select(&Selector::parse("td[data-empty-state]").unwrap())
            .next()
            .expect("No empty state cell");
        assert_eq!(cell.text().collect::<String>(), "No transactions yet.");
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let description = "a".repeat(40);

        let (shown, tooltip) = format_description(&description);

        assert_eq!(shown, format!("{}...", "a".repeat(29)));
        assert_eq!(tooltip, Some(description.as_str()));
        assert_eq!(format_description("short"), ("short".to_owned(), None));
    }
}
