//! The SQLite backend: one row per transaction, queried by owner.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error, Session, UserID,
    live::{LiveFeed, Subscription},
    transaction::{
        core::{
            NewTransaction, Transaction, TransactionId, TransactionPatch, sort_transactions,
        },
        store::{TransactionStore, new_record},
    },
};

/// Create the transaction table and its owner index.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id TEXT PRIMARY KEY,
                owner_id INTEGER NOT NULL,
                kind TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT
                );
        CREATE INDEX IF NOT EXISTS idx_transaction_owner ON \"transaction\"(owner_id);",
    )
}

const SELECT_COLUMNS: &str =
    "SELECT id, kind, amount, category, date, description, owner_id, created_at, updated_at
    FROM \"transaction\"";

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: TransactionId::new(row.get::<_, String>(0)?),
        kind: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        date: row.get(4)?,
        description: row.get(5)?,
        owner_id: UserID::new(row.get(6)?),
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// All of `owner_id`'s transactions, newest first.
fn query_transactions(
    owner_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    // Newest rows first so that records created in the same instant keep
    // newest-first order through the stable sort.
    let mut transactions = connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE owner_id = ?1 ORDER BY rowid DESC"
        ))?
        .query_map([owner_id.as_i64()], map_transaction_row)?
        .collect::<Result<Vec<_>, _>>()?;

    sort_transactions(&mut transactions);

    Ok(transactions)
}

fn query_transaction(
    owner_id: UserID,
    id: &TransactionId,
    connection: &Connection,
) -> Result<Option<Transaction>, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1 AND owner_id = ?2"))?
        .query_row((id.as_str(), owner_id.as_i64()), map_transaction_row)
        .optional()
        .map_err(Error::from)
}

/// Stores transactions in the app's SQLite database.
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
    local_timezone: String,
    feed: LiveFeed<Transaction>,
}

impl SQLiteTransactionStore {
    /// Create a store on `connection`, which must already have the transaction table.
    ///
    /// `local_timezone` is the canonical timezone used for default dates, e.g. "Pacific/Auckland".
    pub fn new(connection: Arc<Mutex<Connection>>, local_timezone: &str) -> Self {
        Self {
            connection,
            local_timezone: local_timezone.to_owned(),
            feed: LiveFeed::new(),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)
    }

    /// Send `owner_id`'s new snapshot to subscribers. Call with the connection
    /// lock held so snapshots are published in write order.
    fn publish(&self, owner_id: UserID, connection: &Connection) -> Result<(), Error> {
        self.feed
            .publish(owner_id, query_transactions(owner_id, connection)?);

        Ok(())
    }
}

impl TransactionStore for SQLiteTransactionStore {
    fn add(&self, session: &Session, data: NewTransaction) -> Result<Transaction, Error> {
        let transaction = new_record(session, data, &self.local_timezone)?;
        let connection = self.lock()?;

        connection.execute(
            "INSERT INTO \"transaction\"
            (id, owner_id, kind, amount, category, date, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            (
                transaction.id.as_str(),
                transaction.owner_id.as_i64(),
                transaction.kind,
                transaction.amount,
                &transaction.category,
                &transaction.date,
                &transaction.description,
                transaction.created_at,
                transaction.updated_at,
            ),
        )?;
        self.publish(transaction.owner_id, &connection)?;

        tracing::debug!("Added transaction {}", transaction.id);

        Ok(transaction)
    }

    fn update(
        &self,
        session: &Session,
        id: &TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, Error> {
        let owner_id = session.require_user()?;
        let connection = self.lock()?;

        let mut transaction =
            query_transaction(owner_id, id, &connection)?.ok_or(Error::UpdateMissingTransaction)?;
        patch.apply(&mut transaction, OffsetDateTime::now_utc());

        let rows_affected = connection.execute(
            "UPDATE \"transaction\"
            SET kind = ?1, amount = ?2, category = ?3, date = ?4, description = ?5, updated_at = ?6
            WHERE id = ?7 AND owner_id = ?8",
            (
                transaction.kind,
                transaction.amount,
                &transaction.category,
                &transaction.date,
                &transaction.description,
                transaction.updated_at,
                transaction.id.as_str(),
                owner_id.as_i64(),
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissingTransaction);
        }

        self.publish(owner_id, &connection)?;

        Ok(transaction)
    }

    fn delete(&self, session: &Session, id: &TransactionId) -> Result<(), Error> {
        let owner_id = session.require_user()?;
        let connection = self.lock()?;

        let rows_affected = connection.execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND owner_id = ?2",
            (id.as_str(), owner_id.as_i64()),
        )?;

        if rows_affected == 0 {
            tracing::info!("Tried to delete missing transaction {id}, nothing to do");
            return Ok(());
        }

        self.publish(owner_id, &connection)
    }

    fn list(&self, session: &Session) -> Result<Vec<Transaction>, Error> {
        let Some(owner_id) = session.user_id() else {
            return Ok(Vec::new());
        };

        let connection = self.lock()?;

        query_transactions(owner_id, &connection)
    }

    fn subscribe(&self, session: &Session) -> Result<Subscription<Transaction>, Error> {
        let owner_id = session.require_user()?;
        let connection = self.lock()?;
        let initial = query_transactions(owner_id, &connection)?;

        Ok(self.feed.subscribe(owner_id, initial))
    }

    fn get(&self, session: &Session, id: &TransactionId) -> Result<Transaction, Error> {
        let owner_id = session.require_user().map_err(|_| Error::NotFound)?;

        let connection = self.lock()?;

        query_transaction(owner_id, id, &connection)?.ok_or(Error::NotFound)
    }
}
