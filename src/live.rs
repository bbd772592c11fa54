//! Per-owner broadcast of full record snapshots.
//!
//! Stores publish the owner's complete set after every write. Subscribers see
//! the current set straight away and then every replacement, never a diff.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use futures_util::{Stream, stream};
use tokio::sync::watch;

use crate::UserID;

/// A snapshot of every record belonging to one owner.
pub type Snapshot<T> = Arc<Vec<T>>;

/// Owner-keyed snapshot channels.
pub struct LiveFeed<T> {
    senders: Mutex<HashMap<UserID, watch::Sender<Snapshot<T>>>>,
}

impl<T> Default for LiveFeed<T> {
    fn default() -> Self {
        Self {
            senders: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: PartialEq> LiveFeed<T> {
    /// Create a feed with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `owner`'s records, starting from `initial`.
    ///
    /// The caller should read `initial` under the same lock it holds for writes
    /// so that no publish is lost between the read and the subscription.
    pub fn subscribe(&self, owner: UserID, initial: Vec<T>) -> Subscription<T> {
        // The map is always valid, even if a holder of the lock panicked.
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);

        let receiver = match senders.get(&owner) {
            Some(sender) => {
                sender.send_if_modified(|current| {
                    if **current == initial {
                        return false;
                    }

                    *current = Arc::new(initial);
                    true
                });
                sender.subscribe()
            }
            None => {
                let (sender, receiver) = watch::channel(Arc::new(initial));
                senders.insert(owner, sender);
                receiver
            }
        };

        Subscription { receiver }
    }

    /// Replace `owner`'s snapshot and wake their subscribers.
    pub fn publish(&self, owner: UserID, snapshot: Vec<T>) {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(sender) = senders.get(&owner) else {
            return;
        };

        if sender.receiver_count() == 0 {
            tracing::debug!("Dropping live feed for user {owner} with no subscribers");
            senders.remove(&owner);
            return;
        }

        sender.send_replace(Arc::new(snapshot));
    }

    #[cfg(test)]
    fn owner_count(&self) -> usize {
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// A live view of one owner's records. Dropping it ends the subscription.
pub struct Subscription<T> {
    receiver: watch::Receiver<Snapshot<T>>,
}

impl<T> Subscription<T> {
    /// The latest snapshot.
    pub fn current(&self) -> Snapshot<T> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next snapshot.
    ///
    /// Returns `None` once the store that feeds this subscription is gone.
    pub async fn changed(&mut self) -> Option<Snapshot<T>> {
        self.receiver.changed().await.ok()?;

        Some(self.receiver.borrow_and_update().clone())
    }
}

impl<T: Send + Sync + 'static> Subscription<T> {
    /// Turn the subscription into a stream that yields the current snapshot
    /// first and then each replacement.
    pub fn into_stream(self) -> impl Stream<Item = Snapshot<T>> + Send + 'static {
        stream::unfold((self, true), |(mut subscription, is_first)| async move {
            let snapshot = if is_first {
                subscription.receiver.borrow_and_update().clone()
            } else {
                subscription.changed().await?
            };

            Some((snapshot, (subscription, false)))
        })
    }
}
