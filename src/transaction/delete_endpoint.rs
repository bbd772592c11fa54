//! Defines the endpoint for deleting a transaction.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Session,
    alert::Alert,
    transaction::{core::TransactionId, form::TransactionState},
};

/// A route handler for deleting a transaction, returns an alert describing the outcome.
pub async fn delete_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<TransactionState>,
    session: Session,
) -> Response {
    match state.transaction_store.delete(&session, &transaction_id) {
        // The status code has to be 200 OK or the page will not remove the transaction.
        Ok(()) => Alert::SuccessSimple {
            message: "Transaction deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
