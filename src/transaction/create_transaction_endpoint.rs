//! Defines the endpoint for creating a new transaction.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that accepts repeated and missing keys
// without rejecting the whole request.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    Session, endpoints,
    transaction::{
        form::{
            TransactionFormData, TransactionFormValues, TransactionState, category_suggestions,
            parse_transaction_form,
        },
        new_transaction_page::new_transaction_form_view,
    },
};

/// A route handler for creating a new transaction, redirects to transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    session: Session,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let new_transaction = match parse_transaction_form(&form) {
        Ok(new_transaction) => new_transaction,
        Err(error_message) => {
            let category_names = state
                .transaction_store
                .list(&session)
                .and_then(|transactions| category_suggestions(&state, &session, &transactions))
                .unwrap_or_default();

            return new_transaction_form_view(
                &TransactionFormValues::from_form(&form),
                &category_names,
                &error_message,
            )
            .into_response();
        }
    };

    match state.transaction_store.add(&session, new_transaction) {
        Ok(transaction) => {
            tracing::debug!("Created transaction {}", transaction.id);

            (
                HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not create transaction: {error}");

            error.into_alert_response()
        }
    }
}
