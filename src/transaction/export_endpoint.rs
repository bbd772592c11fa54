//! Defines the endpoint for downloading the filtered transactions as CSV.

use axum::{
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;

use crate::{
    Session,
    transaction::{
        export::{export_csv, export_file_name},
        filter::{FilterQuery, FilterSpec, filter_transactions},
        form::TransactionState,
    },
};

/// Download the transactions matching the filters in the query string.
///
/// An empty selection gets an alert instead of a file.
pub async fn export_transactions_endpoint(
    State(state): State<TransactionState>,
    session: Session,
    Query(query): Query<FilterQuery>,
) -> Response {
    let transactions = match state.transaction_store.list(&session) {
        Ok(transactions) => transactions,
        Err(error) => {
            tracing::error!("Could not list transactions for export: {error}");
            return error.into_alert_response();
        }
    };

    let filtered = filter_transactions(&transactions, &FilterSpec::from(query));

    match export_csv(&filtered) {
        Ok(csv) => {
            let file_name = export_file_name(OffsetDateTime::now_utc().date());
            tracing::debug!("Exporting {} transactions as {file_name}", filtered.len());

            (
                [
                    (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
                    (
                        CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{file_name}\""),
                    ),
                ],
                csv,
            )
                .into_response()
        }
        Err(error) => {
            tracing::warn!("Could not export transactions: {error}");
            error.into_alert_response()
        }
    }
}
