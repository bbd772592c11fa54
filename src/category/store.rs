//! Storing categories per owner in SQLite.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error, Session, UserID,
    category::domain::{Category, CategoryId, CategoryName, CategoryPatch, NewCategory},
    live::{LiveFeed, Subscription},
};

/// Stores categories per owner.
///
/// Listings are ordered by name, ignoring case, then by creation time.
pub trait CategoryStore: Send + Sync {
    /// Create a category owned by the session's user.
    ///
    /// # Errors
    /// Returns [Error::Unauthenticated] for an anonymous session.
    fn add(&self, session: &Session, data: NewCategory) -> Result<Category, Error>;

    /// Merge `patch` into the category with `id` and stamp its update time.
    ///
    /// # Errors
    /// Returns [Error::Unauthenticated] for an anonymous session, or
    /// [Error::UpdateMissingCategory] if the user has no such category.
    fn update(
        &self,
        session: &Session,
        id: &CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category, Error>;

    /// Remove the category with `id`. Removing a missing category is not an error.
    ///
    /// Transactions that use the category's name keep it.
    ///
    /// # Errors
    /// Returns [Error::Unauthenticated] for an anonymous session.
    fn delete(&self, session: &Session, id: &CategoryId) -> Result<(), Error>;

    /// All of the session user's categories. Anonymous sessions get none.
    fn list(&self, session: &Session) -> Result<Vec<Category>, Error>;

    /// A live view of the session user's categories.
    ///
    /// # Errors
    /// Returns [Error::Unauthenticated] for an anonymous session.
    fn subscribe(&self, session: &Session) -> Result<Subscription<Category>, Error>;

    /// Look up a single category of the session user.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the user has no such category.
    fn get(&self, session: &Session, id: &CategoryId) -> Result<Category, Error>;
}

/// Create the category table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
                id TEXT PRIMARY KEY,
                owner_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                color TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT
                );
        CREATE INDEX IF NOT EXISTS idx_category_owner ON category(owner_id);",
    )
}

const SELECT_COLUMNS: &str =
    "SELECT id, name, kind, color, owner_id, created_at, updated_at FROM category";

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: CategoryId::new(row.get::<_, String>(0)?),
        name: CategoryName::new_unchecked(&row.get::<_, String>(1)?),
        kind: row.get(2)?,
        color: row.get(3)?,
        owner_id: UserID::new(row.get(4)?),
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn query_categories(owner_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE owner_id = ?1
            ORDER BY name COLLATE NOCASE ASC, created_at ASC, rowid ASC"
        ))?
        .query_map([owner_id.as_i64()], map_category_row)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

fn query_category(
    owner_id: UserID,
    id: &CategoryId,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1 AND owner_id = ?2"))?
        .query_row((id.as_str(), owner_id.as_i64()), map_category_row)
        .optional()
        .map_err(Error::from)
}

/// Stores categories in the app's SQLite database.
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
    feed: LiveFeed<Category>,
}

impl SQLiteCategoryStore {
    /// Create a store on `connection`, which must already have the category table.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            connection,
            feed: LiveFeed::new(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)
    }

    fn publish(&self, owner_id: UserID, connection: &Connection) -> Result<(), Error> {
        self.feed
            .publish(owner_id, query_categories(owner_id, connection)?);

        Ok(())
    }
}

impl CategoryStore for SQLiteCategoryStore {
    fn add(&self, session: &Session, data: NewCategory) -> Result<Category, Error> {
        let owner_id = session.require_user()?;
        let category = Category {
            id: CategoryId::generate(),
            name: data.name,
            kind: data.kind,
            color: data.color,
            owner_id,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };
        let connection = self.lock()?;

        connection.execute(
            "INSERT INTO category (id, owner_id, name, kind, color, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                category.id.as_str(),
                owner_id.as_i64(),
                category.name.as_ref(),
                category.kind,
                category.color,
                category.created_at,
                category.updated_at,
            ),
        )?;
        self.publish(owner_id, &connection)?;

        Ok(category)
    }

    fn update(
        &self,
        session: &Session,
        id: &CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category, Error> {
        let owner_id = session.require_user()?;
        let connection = self.lock()?;

        let mut category =
            query_category(owner_id, id, &connection)?.ok_or(Error::UpdateMissingCategory)?;
        patch.apply(&mut category, OffsetDateTime::now_utc());

        connection.execute(
            "UPDATE category SET name = ?1, kind = ?2, color = ?3, updated_at = ?4
            WHERE id = ?5 AND owner_id = ?6",
            (
                category.name.as_ref(),
                category.kind,
                category.color,
                category.updated_at,
                category.id.as_str(),
                owner_id.as_i64(),
            ),
        )?;
        self.publish(owner_id, &connection)?;

        Ok(category)
    }

    fn delete(&self, session: &Session, id: &CategoryId) -> Result<(), Error> {
        let owner_id = session.require_user()?;
        let connection = self.lock()?;

        let rows_affected = connection.execute(
            "DELETE FROM category WHERE id = ?1 AND owner_id = ?2",
            (id.as_str(), owner_id.as_i64()),
        )?;

        if rows_affected == 0 {
            tracing::info!("Tried to delete missing category {id}, nothing to do");
            return Ok(());
        }

        self.publish(owner_id, &connection)
    }

    fn list(&self, session: &Session) -> Result<Vec<Category>, Error> {
        let Some(owner_id) = session.user_id() else {
            return Ok(Vec::new());
        };

        let connection = self.lock()?;

        query_categories(owner_id, &connection)
    }

    fn subscribe(&self, session: &Session) -> Result<Subscription<Category>, Error> {
        let owner_id = session.require_user()?;
        let connection = self.lock()?;
        let initial = query_categories(owner_id, &connection)?;

        Ok(self.feed.subscribe(owner_id, initial))
    }

    fn get(&self, session: &Session, id: &CategoryId) -> Result<Category, Error> {
        let owner_id = session.require_user().map_err(|_| Error::NotFound)?;

        let connection = self.lock()?;

        query_category(owner_id, id, &connection)?.ok_or(Error::NotFound)
    }
}

#[cfg(test)]
mod sqlite_category_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error, Session, UserID,
        category::domain::{CategoryColor, CategoryId, CategoryKind, CategoryName, CategoryPatch, NewCategory},
    };

    use super::{CategoryStore, SQLiteCategoryStore, create_category_table};

    fn get_store() -> SQLiteCategoryStore {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_category_table(&connection).expect("Could not create category table");

        SQLiteCategoryStore::new(Arc::new(Mutex::new(connection)))
    }

    fn session() -> Session {
        Session::authenticated(UserID::new(1))
    }

    fn new_category(name: &str) -> NewCategory {
        NewCategory {
            name: CategoryName::new_unchecked(name),
            kind: CategoryKind::Expense,
            color: CategoryColor::Blue,
        }
    }

    #[test]
    fn add_then_list_round_trips() {
        let store = get_store();

        let added = store.add(&session(), new_category("Food")).unwrap();

        assert_eq!(store.list(&session()), Ok(vec![added.clone()]));
        assert_eq!(added.name.as_ref(), "Food");
        assert_eq!(added.color, CategoryColor::Blue);
        assert_eq!(added.updated_at, None);
    }

    #[test]
    fn list_is_sorted_by_name_ignoring_case() {
        let store = get_store();
        let rent = store.add(&session(), new_category("rent")).unwrap();
        let food = store.add(&session(), new_category("Food")).unwrap();
        let bills = store.add(&session(), new_category("Bills")).unwrap();

        let names = store
            .list(&session())
            .unwrap()
            .into_iter()
            .map(|category| category.id)
            .collect::<Vec<_>>();

        assert_eq!(names, vec![bills.id, food.id, rent.id]);
    }

    #[test]
    fn update_merges_patch() {
        let store = get_store();
        let added = store.add(&session(), new_category("Food")).unwrap();

        let updated = store
            .update(
                &session(),
                &added.id,
                CategoryPatch {
                    kind: Some(CategoryKind::Income),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.kind, CategoryKind::Income);
        assert_eq!(updated.name, added.name);
        assert!(updated.updated_at.is_some());
        assert_eq!(store.get(&session(), &added.id), Ok(updated));
    }

    #[test]
    fn update_missing_fails() {
        let store = get_store();

        let result = store.update(
            &session(),
            &CategoryId::new("missing"),
            CategoryPatch::default(),
        );

        assert_eq!(result, Err(Error::UpdateMissingCategory));
    }

    #[test]
    fn delete_removes_category_and_ignores_missing() {
        let store = get_store();
        let kept = store.add(&session(), new_category("Food")).unwrap();
        let removed = store.add(&session(), new_category("Rent")).unwrap();

        store.delete(&session(), &removed.id).unwrap();
        store.delete(&session(), &removed.id).unwrap();

        assert_eq!(store.list(&session()), Ok(vec![kept]));
    }

    #[test]
    fn categories_are_scoped_to_owner() {
        let store = get_store();
        let other = Session::authenticated(UserID::new(2));
        let added = store.add(&session(), new_category("Food")).unwrap();

        assert_eq!(store.list(&other), Ok(vec![]));
        assert_eq!(store.get(&other, &added.id), Err(Error::NotFound));
        assert_eq!(
            store.update(&other, &added.id, CategoryPatch::default()),
            Err(Error::UpdateMissingCategory)
        );
    }

    #[test]
    fn anonymous_session_is_refused() {
        let store = get_store();
        let anonymous = Session::anonymous();

        assert_eq!(store.list(&anonymous), Ok(vec![]));
        assert_eq!(
            store.add(&anonymous, new_category("Food")),
            Err(Error::Unauthenticated)
        );
        assert_eq!(
            store.delete(&anonymous, &CategoryId::new("any")),
            Err(Error::Unauthenticated)
        );
    }

    #[tokio::test]
    async fn subscription_receives_snapshots() {
        let store = get_store();
        let mut subscription = store.subscribe(&session()).unwrap();
        assert!(subscription.current().is_empty());

        let added = store.add(&session(), new_category("Food")).unwrap();

        assert_eq!(subscription.changed().await.as_deref(), Some(&vec![added]));
    }
}
