//! Server-sent events carrying the user's full category registry.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::{Stream, StreamExt};

use crate::{Error, Session, category::form::CategoryState};

/// Stream a `snapshot` event with every category of the user as JSON, first
/// straight away and then after each change.
pub async fn live_categories_endpoint(
    State(state): State<CategoryState>,
    session: Session,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, Error> {
    let subscription = state
        .category_store
        .subscribe(&session)
        .inspect_err(|error| tracing::warn!("Could not subscribe to categories: {error}"))?;

    let events = subscription
        .into_stream()
        .map(|snapshot| Event::default().event("snapshot").json_data(&*snapshot));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
