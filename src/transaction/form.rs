//! The form shared by the create and edit transaction pages.

use std::sync::Arc;

use axum::extract::FromRef;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error, Session,
    category::CategoryStore,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner,
    },
    transaction::{
        aggregation::category_list,
        core::{NewTransaction, Transaction, TransactionKind},
        store::TransactionStore,
    },
};

/// The state needed by the transaction pages and endpoints.
#[derive(Clone)]
pub struct TransactionState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub transaction_store: Arc<dyn TransactionStore>,
    /// Used to suggest category names in the form.
    pub category_store: Arc<dyn CategoryStore>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            transaction_store: state.transaction_store.clone(),
            category_store: state.category_store.clone(),
        }
    }
}

/// The raw form data for creating or editing a transaction.
///
/// Every field is text so that a half-filled form can be shown again with
/// what the user typed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFormData {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

/// What to show in the form's fields.
pub(super) struct TransactionFormValues<'a> {
    pub kind: TransactionKind,
    pub amount: &'a str,
    pub category: &'a str,
    pub date: &'a str,
    pub description: &'a str,
}

impl<'a> TransactionFormValues<'a> {
    pub(super) fn from_form(form: &'a TransactionFormData) -> Self {
        Self {
            kind: form.kind.parse().unwrap_or(TransactionKind::Expense),
            amount: &form.amount,
            category: &form.category,
            date: &form.date,
            description: &form.description,
        }
    }

    /// An empty form for a new expense dated `date`.
    pub(super) fn new_expense(date: &'a str) -> Self {
        Self {
            kind: TransactionKind::Expense,
            amount: "",
            category: "",
            date,
            description: "",
        }
    }
}

/// Check the submitted form.
///
/// The amount is passed on as typed, the store turns anything that is not a
/// number into 0. A blank date is left for the store to fill in with today.
pub(super) fn parse_transaction_form(form: &TransactionFormData) -> Result<NewTransaction, String> {
    let kind = match form.kind.trim() {
        "" => TransactionKind::Expense,
        kind => kind.parse().map_err(|error| format!("Error: {error}"))?,
    };

    let category = form.category.trim();
    if category.is_empty() {
        return Err("Error: Choose a category".to_owned());
    }

    Ok(NewTransaction {
        kind,
        amount: form.amount.clone(),
        category: category.to_owned(),
        date: Some(form.date.clone()),
        description: Some(form.description.trim().to_owned()),
    })
}

/// The category names to suggest: the user's categories first, then any
/// other names used by their transactions.
pub(super) fn category_suggestions(
    state: &TransactionState,
    session: &Session,
    transactions: &[Transaction],
) -> Result<Vec<String>, Error> {
    let mut names: Vec<String> = state
        .category_store
        .list(session)?
        .into_iter()
        .map(|category| category.name.to_string())
        .collect();

    for name in category_list(transactions) {
        if !names.contains(&name) {
            names.push(name);
        }
    }

    Ok(names)
}

pub(super) fn transaction_form_view(
    hx_attribute: &str,
    endpoint: &str,
    submit_label: &str,
    values: &TransactionFormValues<'_>,
    category_names: &[String],
    error_message: &str,
) -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            hx-put=[(hx_attribute == "hx-put").then_some(endpoint)]
            hx-post=[(hx_attribute == "hx-post").then_some(endpoint)]
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            class="w-full space-y-4 md:space-y-6"
        {
            fieldset class="space-y-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Transaction type" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for (kind, label) in [
                        (TransactionKind::Expense, "Expense"),
                        (TransactionKind::Income, "Income"),
                    ] {
                        @let id = format!("transaction-kind-{kind}");

                        div class="flex items-center gap-3"
                        {
                            input
                                name="kind"
                                id=(id)
                                type="radio"
                                value=(kind.as_str())
                                checked[values.kind == kind]
                                required
                                tabindex="0"
                                class=(FORM_RADIO_INPUT_STYLE);

                            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (label) }
                        }
                    }
                }
            }

            div
            {
                label
                    for="amount"
                    class=(FORM_LABEL_STYLE)
                {
                    "Amount"
                }

                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0"
                        placeholder="0.00"
                        value=(values.amount)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label
                    for="category"
                    class=(FORM_LABEL_STYLE)
                {
                    "Category"
                }

                input
                    name="category"
                    id="category"
                    type="text"
                    list="category-options"
                    placeholder="e.g. Food"
                    value=(values.category)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                datalist id="category-options"
                {
                    @for name in category_names {
                        option value=(name) {}
                    }
                }
            }

            div
            {
                label
                    for="date"
                    class=(FORM_LABEL_STYLE)
                {
                    "Date"
                }

                input
                    name="date"
                    id="date"
                    type="date"
                    value=(values.date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="description"
                    class=(FORM_LABEL_STYLE)
                {
                    "Description"
                }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="e.g. grocery shopping"
                    value=(values.description)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE)
                {
                    (error_message)
                }
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (spinner) }
                " " (submit_label)
            }
        }
    }
}
