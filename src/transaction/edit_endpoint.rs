//! Defines the endpoint for updating a transaction.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    Error, Session, endpoints,
    transaction::{
        core::{TransactionId, TransactionPatch},
        edit_page::edit_transaction_form_view,
        form::{
            TransactionFormData, TransactionFormValues, TransactionState, category_suggestions,
            parse_transaction_form,
        },
    },
};

/// A route handler for updating a transaction, redirects to transactions view on success.
///
/// A blank date keeps the transaction's current date.
pub async fn update_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<TransactionState>,
    session: Session,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let parsed = match parse_transaction_form(&form) {
        Ok(parsed) => parsed,
        Err(error_message) => {
            let update_endpoint =
                endpoints::format_endpoint(endpoints::TRANSACTION, &transaction_id);
            let category_names = state
                .transaction_store
                .list(&session)
                .and_then(|transactions| category_suggestions(&state, &session, &transactions))
                .unwrap_or_default();

            return edit_transaction_form_view(
                &update_endpoint,
                &TransactionFormValues::from_form(&form),
                &category_names,
                &error_message,
            )
            .into_response();
        }
    };

    let patch = TransactionPatch {
        kind: Some(parsed.kind),
        amount: Some(parsed.amount),
        category: Some(parsed.category),
        date: parsed.date.filter(|date| !date.trim().is_empty()),
        description: parsed.description,
    };

    match state.transaction_store.update(&session, &transaction_id, patch) {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingTransaction) => {
            tracing::warn!("Tried to update missing transaction {transaction_id}");
            Error::UpdateMissingTransaction.into_alert_response()
        }
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
