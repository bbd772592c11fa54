//! The local backend: every owner's transactions in one JSON array, read and
//! written whole on each operation.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

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

/// The key the transaction blob is stored under.
pub const STORAGE_KEY: &str = "transactions_v1";

/// Stores transactions as a JSON blob in `<data_dir>/transactions_v1.json`.
pub struct LocalTransactionStore {
    path: PathBuf,
    local_timezone: String,
    file_lock: Mutex<()>,
    feed: LiveFeed<Transaction>,
}

impl LocalTransactionStore {
    /// Create a store that keeps its blob in `data_dir`. The directory is
    /// created on the first write.
    pub fn new(data_dir: &Path, local_timezone: &str) -> Self {
        Self {
            path: data_dir.join(format!("{STORAGE_KEY}.json")),
            local_timezone: local_timezone.to_owned(),
            file_lock: Mutex::new(()),
            feed: LiveFeed::new(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, Error> {
        self.file_lock.lock().map_err(|_| Error::DatabaseLockError)
    }

    fn read_all(&self) -> Result<Vec<Transaction>, Error> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => {
                return Err(Error::StorageError(format!(
                    "could not read {}: {error}",
                    self.path.display()
                )));
            }
        };

        if json.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&json).map_err(|error| {
            Error::StorageError(format!("could not parse {}: {error}", self.path.display()))
        })
    }

    fn write_all(&self, transactions: &[Transaction]) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(transactions)
            .map_err(|error| Error::StorageError(error.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                Error::StorageError(format!("could not create {}: {error}", parent.display()))
            })?;
        }

        fs::write(&self.path, json).map_err(|error| {
            Error::StorageError(format!("could not write {}: {error}", self.path.display()))
        })
    }

    fn write_and_publish(
        &self,
        owner_id: UserID,
        transactions: &[Transaction],
    ) -> Result<(), Error> {
        self.write_all(transactions)?;
        self.feed
            .publish(owner_id, owned_by(owner_id, transactions));

        Ok(())
    }
}

fn owned_by(owner_id: UserID, transactions: &[Transaction]) -> Vec<Transaction> {
    let mut owned = transactions
        .iter()
        .filter(|transaction| transaction.owner_id == owner_id)
        .cloned()
        .collect::<Vec<_>>();

    sort_transactions(&mut owned);

    owned
}

impl TransactionStore for LocalTransactionStore {
    fn add(&self, session: &Session, data: NewTransaction) -> Result<Transaction, Error> {
        let transaction = new_record(session, data, &self.local_timezone)?;
        let _guard = self.lock()?;

        let mut transactions = self.read_all()?;
        transactions.insert(0, transaction.clone());
        self.write_and_publish(transaction.owner_id, &transactions)?;

        Ok(transaction)
    }

    fn update(
        &self,
        session: &Session,
        id: &TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, Error> {
        let owner_id = session.require_user()?;
        let _guard = self.lock()?;

        let mut transactions = self.read_all()?;
        let transaction = transactions
            .iter_mut()
            .find(|transaction| &transaction.id == id && transaction.owner_id == owner_id)
            .ok_or(Error::UpdateMissingTransaction)?;
        patch.apply(transaction, OffsetDateTime::now_utc());
        let updated = transaction.clone();

        self.write_and_publish(owner_id, &transactions)?;

        Ok(updated)
    }

    fn delete(&self, session: &Session, id: &TransactionId) -> Result<(), Error> {
        let owner_id = session.require_user()?;
        let _guard = self.lock()?;

        let mut transactions = self.read_all()?;
        let count_before = transactions.len();
        transactions
            .retain(|transaction| !(&transaction.id == id && transaction.owner_id == owner_id));

        if transactions.len() == count_before {
            tracing::info!("Tried to delete missing transaction {id}, nothing to do");
            return Ok(());
        }

        self.write_and_publish(owner_id, &transactions)
    }

    fn list(&self, session: &Session) -> Result<Vec<Transaction>, Error> {
        let Some(owner_id) = session.user_id() else {
            return Ok(Vec::new());
        };
        let _guard = self.lock()?;

        Ok(owned_by(owner_id, &self.read_all()?))
    }

    fn subscribe(&self, session: &Session) -> Result<Subscription<Transaction>, Error> {
        let owner_id = session.require_user()?;
        let _guard = self.lock()?;
        let initial = owned_by(owner_id, &self.read_all()?);

        Ok(self.feed.subscribe(owner_id, initial))
    }
}

#[cfg(test)]
mod local_transaction_store_tests {
    use std::{fs, path::PathBuf};

    use uuid::Uuid;

    use crate::{Error, Session, UserID, transaction::store::contract};

    use super::{LocalTransactionStore, STORAGE_KEY, TransactionStore};

    /// A scratch directory that is removed when the test ends.
    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            Self(std::env::temp_dir().join(format!("fintrack-test-{}", Uuid::new_v4())))
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn get_store(dir: &TempDir) -> LocalTransactionStore {
        LocalTransactionStore::new(&dir.0, "Etc/UTC")
    }

    #[test]
    fn add_then_list_round_trips() {
        let dir = TempDir::new();
        contract::add_then_list_round_trips(&get_store(&dir));
    }

    #[test]
    fn add_defaults_missing_date_to_today() {
        let dir = TempDir::new();
        contract::add_defaults_missing_date_to_today(&get_store(&dir));
    }

    #[test]
    fn list_is_newest_first() {
        let dir = TempDir::new();
        contract::list_is_newest_first(&get_store(&dir));
    }

    #[test]
    fn update_merges_patch() {
        let dir = TempDir::new();
        contract::update_merges_patch(&get_store(&dir));
    }

    #[test]
    fn empty_patch_only_changes_updated_at() {
        let dir = TempDir::new();
        contract::empty_patch_only_changes_updated_at(&get_store(&dir));
    }

    #[test]
    fn update_missing_fails() {
        let dir = TempDir::new();
        contract::update_missing_fails(&get_store(&dir));
    }

    #[test]
    fn delete_removes_record() {
        let dir = TempDir::new();
        contract::delete_removes_record(&get_store(&dir));
    }

    #[test]
    fn delete_missing_is_noop() {
        let dir = TempDir::new();
        contract::delete_missing_is_noop(&get_store(&dir));
    }

    #[test]
    fn anonymous_session_is_refused() {
        let dir = TempDir::new();
        contract::anonymous_session_is_refused(&get_store(&dir));
    }

    #[test]
    fn records_are_scoped_to_owner() {
        let dir = TempDir::new();
        contract::records_are_scoped_to_owner(&get_store(&dir));
    }

    #[tokio::test]
    async fn subscription_receives_snapshots() {
        let dir = TempDir::new();
        contract::subscription_receives_snapshots(&get_store(&dir)).await;
    }

    #[test]
    fn records_survive_a_new_store() {
        let dir = TempDir::new();
        let session = contract::session();
        let added = get_store(&dir).add(&session, contract::salary()).unwrap();

        let listed = get_store(&dir).list(&session).unwrap();

        assert_eq!(listed, vec![added]);
    }

    #[test]
    fn reads_legacy_blob_with_string_amounts() {
        let dir = TempDir::new();
        fs::create_dir_all(&dir.0).unwrap();
        fs::write(
            dir.0.join(format!("{STORAGE_KEY}.json")),
            r#"[{"id":"legacy","kind":"income","amount":"42.5","category":"Gift",
                "date":"2023-12-25","owner_id":1,"created_at":"2023-12-25T09:00:00Z"}]"#,
        )
        .unwrap();

        let listed = get_store(&dir)
            .list(&Session::authenticated(UserID::new(1)))
            .unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].amount, 42.5);
        assert_eq!(listed[0].description, "");
    }

    #[test]
    fn corrupt_blob_is_a_storage_error() {
        let dir = TempDir::new();
        fs::create_dir_all(&dir.0).unwrap();
        fs::write(dir.0.join(format!("{STORAGE_KEY}.json")), "{not json").unwrap();

        let result = get_store(&dir).list(&contract::session());

        assert!(matches!(result, Err(Error::StorageError(_))));
    }
}
