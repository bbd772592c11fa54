//! The interface shared by the transaction backends.

use time::OffsetDateTime;

use crate::{
    Error, Session,
    live::Subscription,
    timezone::local_today,
    transaction::core::{
        NewTransaction, Transaction, TransactionId, TransactionPatch, coerce_amount, format_date,
    },
};

/// Stores transactions per owner.
///
/// Every listing follows the same order: date descending, invalid dates
/// last, then the most recently created first.
pub trait TransactionStore: Send + Sync {
    /// Create a transaction owned by the session's user.
    ///
    /// A missing or blank date becomes today in the store's timezone, the
    /// amount is coerced and a missing description becomes empty.
    ///
    /// # Errors
    /// Returns [Error::Unauthenticated] for an anonymous session.
    fn add(&self, session: &Session, data: NewTransaction) -> Result<Transaction, Error>;

    /// Merge `patch` into the transaction with `id` and stamp its update time.
    ///
    /// # Errors
    /// Returns [Error::Unauthenticated] for an anonymous session, or
    /// [Error::UpdateMissingTransaction] if the user has no such transaction.
    fn update(
        &self,
        session: &Session,
        id: &TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, Error>;

    /// Remove the transaction with `id`. Removing a missing transaction is not an error.
    ///
    /// # Errors
    /// Returns [Error::Unauthenticated] for an anonymous session.
    fn delete(&self, session: &Session, id: &TransactionId) -> Result<(), Error>;

    /// All of the session user's transactions. Anonymous sessions get none.
    fn list(&self, session: &Session) -> Result<Vec<Transaction>, Error>;

    /// A live view of the session user's transactions.
    ///
    /// # Errors
    /// Returns [Error::Unauthenticated] for an anonymous session.
    fn subscribe(&self, session: &Session) -> Result<Subscription<Transaction>, Error>;

    /// Look up a single transaction of the session user.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the user has no such transaction.
    fn get(&self, session: &Session, id: &TransactionId) -> Result<Transaction, Error> {
        self.list(session)?
            .into_iter()
            .find(|transaction| &transaction.id == id)
            .ok_or(Error::NotFound)
    }
}

/// Build the record for `data` the way both backends create it.
pub(super) fn new_record(
    session: &Session,
    data: NewTransaction,
    local_timezone: &str,
) -> Result<Transaction, Error> {
    let owner_id = session.require_user()?;

    let date = match data.date {
        Some(date) if !date.trim().is_empty() => date.trim().to_owned(),
        _ => format_date(local_today(local_timezone)?),
    };

    Ok(Transaction {
        id: TransactionId::generate(),
        kind: data.kind,
        amount: coerce_amount(&data.amount),
        category: data.category,
        date,
        description: data.description.unwrap_or_default(),
        owner_id,
        created_at: OffsetDateTime::now_utc(),
        updated_at: None,
    })
}
