//! Typed pantry ledger backed by the server-owned SQLite file.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use butler_core::{Error, Result};

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS inventory (
    id     INTEGER PRIMARY KEY AUTOINCREMENT,
    name   TEXT NOT NULL,
    amount REAL NOT NULL,
    unit   TEXT NOT NULL
)";

/// A single inventory item.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// Shared inventory store. Unlike [`crate::Database`] this is server state
/// used from multiple handlers, so the connection sits behind a mutex.
pub struct InventoryStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl InventoryStore {
    /// Open or create the inventory database at `db_path`.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::Storage(e.to_string()))?;
        }

        let conn = Connection::open(&db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute(SCHEMA_SQL, [])
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        let count = store.list()?.len();
        info!(
            "InventoryStore initialized: {} items, path={}",
            count,
            store.db_path.display()
        );
        Ok(store)
    }

    /// Look up an item by exact name.
    pub fn find(&self, name: &str) -> Result<Option<Item>> {
        let conn = self.conn.lock();
        Self::find_in(&conn, name)
    }

    /// Upsert: an existing item's amount is incremented (unit left as
    /// stored), otherwise a new row is inserted. Returns the resulting item.
    /// Negative amounts are allowed; the result may go to zero or below.
    pub fn add(&self, name: &str, amount: f64, unit: &str) -> Result<Item> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| Error::Database(e.to_string()))?;

        match Self::find_in(&tx, name)? {
            Some(item) => {
                tx.execute(
                    "UPDATE inventory SET amount = ?1 WHERE id = ?2",
                    params![item.amount + amount, item.id],
                )
                .map_err(|e| Error::Database(e.to_string()))?;
            }
            None => {
                tx.execute(
                    "INSERT INTO inventory (name, amount, unit) VALUES (?1, ?2, ?3)",
                    params![name, amount, unit],
                )
                .map_err(|e| Error::Database(e.to_string()))?;
            }
        }
        tx.commit().map_err(|e| Error::Database(e.to_string()))?;

        Self::find_in(&conn, name)?
            .ok_or_else(|| Error::Database(format!("item '{}' missing after upsert", name)))
    }

    /// `add` with the amount negated. Reducing an absent item inserts a
    /// negative inventory row.
    pub fn reduce(&self, name: &str, amount: f64, unit: &str) -> Result<Item> {
        self.add(name, -amount, unit)
    }

    /// All items, insertion order.
    pub fn list(&self) -> Result<Vec<Item>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT id, name, amount, unit FROM inventory ORDER BY id")
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map([], Self::row_to_item)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    fn find_in(conn: &Connection, name: &str) -> Result<Option<Item>> {
        conn.prepare_cached("SELECT id, name, amount, unit FROM inventory WHERE name = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![name], Self::row_to_item)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))
    }

    fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
        Ok(Item {
            id: row.get(0)?,
            name: row.get(1)?,
            amount: row.get(2)?,
            unit: row.get(3)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (InventoryStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = InventoryStore::open(dir.path().join("butler.db")).unwrap();
        (store, dir)
    }

    #[test]
    fn test_add_new_item() {
        let (store, _dir) = test_store();

        let item = store.add("milk", 2.0, "liters").unwrap();
        assert_eq!(item.name, "milk");
        assert_eq!(item.amount, 2.0);
        assert_eq!(item.unit, "liters");
    }

    #[test]
    fn test_add_increments_existing() {
        let (store, _dir) = test_store();

        store.add("eggs", 6.0, "pieces").unwrap();
        let item = store.add("eggs", 4.0, "pieces").unwrap();
        assert_eq!(item.amount, 10.0);

        // Only one row exists.
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_reduce_goes_negative() {
        let (store, _dir) = test_store();

        store.add("flour", 1.0, "kg").unwrap();
        let item = store.reduce("flour", 3.0, "kg").unwrap();
        assert_eq!(item.amount, -2.0);
    }

    #[test]
    fn test_reduce_absent_inserts_negative_row() {
        let (store, _dir) = test_store();

        let item = store.reduce("butter", 1.0, "packs").unwrap();
        assert_eq!(item.amount, -1.0);
        assert_eq!(item.unit, "packs");
    }

    #[test]
    fn test_find_absent_is_none() {
        let (store, _dir) = test_store();

        assert!(store.find("nothing").unwrap().is_none());
    }

    #[test]
    fn test_list_insertion_order() {
        let (store, _dir) = test_store();

        store.add("milk", 1.0, "liters").unwrap();
        store.add("eggs", 12.0, "pieces").unwrap();
        store.add("flour", 2.0, "kg").unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["milk", "eggs", "flour"]);
    }
}
