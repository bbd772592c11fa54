//! Server-sent events carrying the user's full set of transactions.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::{Stream, StreamExt};

use crate::{Error, Session, transaction::form::TransactionState};

/// Stream a `snapshot` event with every transaction of the user as JSON, first
/// straight away and then after each change.
///
/// Each event replaces the whole set, there are no partial updates.
pub async fn live_transactions_endpoint(
    State(state): State<TransactionState>,
    session: Session,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, Error> {
    let subscription = state
        .transaction_store
        .subscribe(&session)
        .inspect_err(|error| tracing::warn!("Could not subscribe to transactions: {error}"))?;

    let events = subscription
        .into_stream()
        .map(|snapshot| Event::default().event("snapshot").json_data(&*snapshot));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
