//! Totals and breakdowns derived from a set of transactions.
//!
//! Everything here is recomputed from the full set on every request and
//! never fails. Formatting of the amounts is left to the pages.

use crate::transaction::core::{Transaction, TransactionKind};

/// The label for transactions whose date could not be parsed.
pub const INVALID_DATE_LABEL: &str = "Invalid Date";

/// The sum of income, the sum of expenses and their difference.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    /// `income - expense`, may be negative.
    pub net: f64,
}

/// Income and expenses of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    /// The category name exactly as it appears on the transactions.
    pub name: String,
    pub income: f64,
    pub expense: f64,
}

/// Income and expenses of one calendar month, regardless of year.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    /// The month's three letter abbreviation, e.g. "Jan", or [INVALID_DATE_LABEL].
    pub label: String,
    pub income: f64,
    pub expense: f64,
}

/// Add up the income and expenses in `transactions`.
pub fn totals(transactions: &[Transaction]) -> Totals {
    let (income, expense) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(income, expense), transaction| {
                match transaction.kind {
                    TransactionKind::Income => (income + transaction.amount, expense),
                    TransactionKind::Expense => (income, expense + transaction.amount),
                }
            });

    Totals {
        income,
        expense,
        net: income - expense,
    }
}

/// Income and expenses per category, in the order the categories first appear.
///
/// Names are compared verbatim, so "Food" and "food " are different categories.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategorySummary> {
    let mut summaries: Vec<CategorySummary> = Vec::new();

    for transaction in transactions {
        let index = match summaries
            .iter()
            .position(|summary| summary.name == transaction.category)
        {
            Some(index) => index,
            None => {
                summaries.push(CategorySummary {
                    name: transaction.category.clone(),
                    income: 0.0,
                    expense: 0.0,
                });
                summaries.len() - 1
            }
        };

        let summary = &mut summaries[index];
        match transaction.kind {
            TransactionKind::Income => summary.income += transaction.amount,
            TransactionKind::Expense => summary.expense += transaction.amount,
        }
    }

    summaries
}

/// Income and expenses per month label, in the order the labels first appear.
///
/// The same month of different years shares a label.
pub fn month_breakdown(transactions: &[Transaction]) -> Vec<MonthSummary> {
    let mut summaries: Vec<MonthSummary> = Vec::new();

    for transaction in transactions {
        let label = transaction
            .parsed_date()
            .map(|date| month_abbreviation(date.month()))
            .unwrap_or(INVALID_DATE_LABEL);

        let index = match summaries.iter().position(|summary| summary.label == label) {
            Some(index) => index,
            None => {
                summaries.push(MonthSummary {
                    label: label.to_owned(),
                    income: 0.0,
                    expense: 0.0,
                });
                summaries.len() - 1
            }
        };

        let summary = &mut summaries[index];
        match transaction.kind {
            TransactionKind::Income => summary.income += transaction.amount,
            TransactionKind::Expense => summary.expense += transaction.amount,
        }
    }

    summaries
}

/// The distinct, non-empty category names in the order they first appear.
pub fn category_list(transactions: &[Transaction]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for transaction in transactions {
        if !transaction.category.is_empty() && !names.contains(&transaction.category) {
            names.push(transaction.category.clone());
        }
    }

    names
}

fn month_abbreviation(month: time::Month) -> &'static str {
    use time::Month;

    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// Every derived view the analytics page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Analytics {
    pub totals: Totals,
    pub categories: Vec<CategorySummary>,
    pub months: Vec<MonthSummary>,
    pub category_names: Vec<String>,
}

impl Analytics {
    pub fn new(transactions: &[Transaction]) -> Self {
        Self {
            totals: totals(transactions),
            categories: category_breakdown(transactions),
            months: month_breakdown(transactions),
            category_names: category_list(transactions),
        }
    }
}
