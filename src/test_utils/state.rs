//! In-memory application state for handler tests.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    AppState, StoreBackend,
    category::{CategoryState, SQLiteCategoryStore, create_category_table},
    transaction::{SQLiteTransactionStore, TransactionState, create_transaction_table},
};

pub const TEST_TIMEZONE: &str = "Etc/UTC";

#[track_caller]
pub fn test_app_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(connection, "foobar", TEST_TIMEZONE, StoreBackend::Sqlite)
        .expect("Could not create app state")
}

#[track_caller]
pub fn test_category_state() -> CategoryState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    create_category_table(&connection).expect("Could not create category table");

    CategoryState {
        category_store: Arc::new(SQLiteCategoryStore::new(Arc::new(Mutex::new(connection)))),
    }
}

/// Transaction state whose category store shares the same database.
#[track_caller]
pub fn test_transaction_state() -> TransactionState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    create_transaction_table(&connection).expect("Could not create transaction table");
    create_category_table(&connection).expect("Could not create category table");
    let connection = Arc::new(Mutex::new(connection));

    TransactionState {
        local_timezone: TEST_TIMEZONE.to_owned(),
        transaction_store: Arc::new(SQLiteTransactionStore::new(
            connection.clone(),
            TEST_TIMEZONE,
        )),
        category_store: Arc::new(SQLiteCategoryStore::new(connection)),
    }
}
