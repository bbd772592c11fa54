//! Table views for the analytics breakdowns.

use maud::{Markup, html};

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    transaction::{CategorySummary, MonthSummary},
};

const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for positive, red for negative).
fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        TABLE_CELL_GREEN_STYLE
    } else {
        TABLE_CELL_RED_STYLE
    }
}

/// One row of a breakdown table.
struct BreakdownRow<'a> {
    label: &'a str,
    income: f64,
    expense: f64,
}

pub(super) fn monthly_table(months: &[MonthSummary]) -> Markup {
    let rows = months
        .iter()
        .map(|month| BreakdownRow {
            label: &month.label,
            income: month.income,
            expense: month.expense,
        })
        .collect::<Vec<_>>();

    breakdown_table("Monthly Breakdown", "Month", "monthly-table", &rows)
}

pub(super) fn category_table(categories: &[CategorySummary]) -> Markup {
    let rows = categories
        .iter()
        .map(|category| BreakdownRow {
            label: &category.name,
            income: category.income,
            expense: category.expense,
        })
        .collect::<Vec<_>>();

    breakdown_table("Category Breakdown", "Category", "category-table", &rows)
}

fn breakdown_table(title: &str, label_header: &str, id: &str, rows: &[BreakdownRow<'_>]) -> Markup {
    html! {
        div
        {
            h3 class="text-xl font-semibold mb-4" { (title) }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table id=(id) class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { (label_header) }
                            th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Income" }
                            th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Expense" }
                            th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Net" }
                        }
                    }

                    tbody
                    {
                        @for row in rows {
                            @let net = row.income - row.expense;

                            tr class=(TABLE_ROW_STYLE)
                            {
                                th scope="row" class="px-6 py-4 font-medium text-gray-900 dark:text-white"
                                {
                                    @if row.label.is_empty() { "-" } @else { (row.label) }
                                }
                                td class={ (TABLE_CELL_STYLE) " text-right " (TABLE_CELL_GREEN_STYLE) }
                                {
                                    (format_currency(row.income))
                                }
                                td class={ (TABLE_CELL_STYLE) " text-right " (TABLE_CELL_RED_STYLE) }
                                {
                                    (format_currency(row.expense))
                                }
                                td class={ (TABLE_CELL_STYLE) " text-right font-semibold " (amount_color_class(net)) }
                                {
                                    (format_currency(net))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod analytics_table_tests {
    use scraper::{Html, Selector};

    use crate::transaction::CategorySummary;

    use super::category_table;

    #[test]
    fn category_rows_keep_order_and_show_net() {
        let categories = vec![
            CategorySummary {
                name: "Salary".to_owned(),
                income: 1000.0,
                expense: 0.0,
            },
            CategorySummary {
                name: String::new(),
                income: 0.0,
                expense: 12.0,
            },
        ];

        let html = Html::parse_fragment(&category_table(&categories).into_string());

        let labels = html
            .select(&Selector::parse("#category-table tbody th").unwrap())
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["Salary", "-"]);

        let net = html
            .select(&Selector::parse("#category-table tbody tr td:nth-child(4)").unwrap())
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect::<Vec<_>>();
        assert!(net[1].starts_with("-$"), "got {}", net[1]);
    }
}
