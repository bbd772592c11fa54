//! Implements a struct that holds the state of the REST server.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error,
    auth::DEFAULT_COOKIE_DURATION,
    category::{CategoryStore, SQLiteCategoryStore},
    db::initialize,
    transaction::{LocalTransactionStore, SQLiteTransactionStore, TransactionStore},
};

/// Where transactions are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// In the app's SQLite database, alongside users and categories.
    Sqlite,
    /// In a JSON file in the given directory.
    Local(PathBuf),
}

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The database connection for users and categories, and transactions when
    /// using [StoreBackend::Sqlite].
    pub db_connection: Arc<Mutex<Connection>>,

    /// The store for every user's transactions.
    pub transaction_store: Arc<dyn TransactionStore>,

    /// The store for every user's categories.
    pub category_store: Arc<dyn CategoryStore>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
        backend: StoreBackend,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        let transaction_store: Arc<dyn TransactionStore> = match backend {
            StoreBackend::Sqlite => Arc::new(SQLiteTransactionStore::new(
                connection.clone(),
                local_timezone,
            )),
            StoreBackend::Local(data_dir) => {
                tracing::info!("Storing transactions in {}", data_dir.display());
                Arc::new(LocalTransactionStore::new(&data_dir, local_timezone))
            }
        };

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            category_store: Arc::new(SQLiteCategoryStore::new(connection.clone())),
            transaction_store,
            db_connection: connection,
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub(crate) fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
