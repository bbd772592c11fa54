//! The page for recording a new transaction.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, Session, endpoints,
    html::{FORM_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    timezone::local_today,
    transaction::{
        core::format_date,
        form::{TransactionFormValues, TransactionState, category_suggestions, transaction_form_view},
    },
};

/// Render the new transaction page, dated today in the server's timezone.
pub async fn get_new_transaction_page(
    State(state): State<TransactionState>,
    session: Session,
) -> Result<Response, Error> {
    let today = format_date(local_today(&state.local_timezone)?);
    let transactions = state.transaction_store.list(&session)?;
    let category_names = category_suggestions(&state, &session, &transactions)
        .inspect_err(|error| tracing::error!("Could not list categories: {error}"))?;

    let form = new_transaction_form_view(
        &TransactionFormValues::new_expense(&today),
        &category_names,
        "",
    );

    Ok(new_transaction_view(&form).into_response())
}

pub(super) fn new_transaction_form_view(
    values: &TransactionFormValues<'_>,
    category_names: &[String],
    error_message: &str,
) -> Markup {
    transaction_form_view(
        "hx-post",
        endpoints::TRANSACTIONS_API,
        "Add Transaction",
        values,
        category_names,
        error_message,
    )
}

fn new_transaction_view(form: &Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Add Transaction" }
            (form)
        }
    };

    base(
        "Add Transaction",
        &[dollar_input_styles()],
        &content,
    )
}
