//! Dual-backend key-value/query store over a single SQLite file.
//!
//! Two independently-owned connections are layered over one path: a
//! byte-oriented key-value view (its own `kv` table, last write wins) and a
//! raw relational view for arbitrary SQL. The two views share no
//! transactional scope; each connection manages its own locking.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::types::{Row, SqlValue};
use butler_core::{Error, Result};

const KV_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key   BLOB NOT NULL UNIQUE,
    value BLOB NOT NULL
)";

struct Handles {
    kv: Connection,
    sql: Connection,
}

/// A minimal persistent mapping from string keys to string-convertible
/// values, backed by a file, plus an escape hatch for arbitrary SQL against
/// the same file.
///
/// Every accessor fails with [`Error::NotOpen`] outside the `open`/`close`
/// bracket. `&mut self` receivers express the exclusive single-owner model;
/// concurrent multi-owner access is unsupported.
pub struct Database {
    path: PathBuf,
    handles: Option<Handles>,
}

impl Database {
    /// Records the path; performs no I/O.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            handles: None,
        }
    }

    /// Open both handles against the path, creating the backing file if
    /// absent. Calling this again reassigns both handles; the previous
    /// handles are released by the assignment.
    pub fn open(&mut self) -> Result<()> {
        let kv = Connection::open(&self.path).map_err(|e| Error::Database(e.to_string()))?;
        kv.execute(KV_SCHEMA, [])
            .map_err(|e| Error::Database(e.to_string()))?;
        let sql = Connection::open(&self.path).map_err(|e| Error::Database(e.to_string()))?;

        debug!("opened store at {}", self.path.display());
        self.handles = Some(Handles { kv, sql });
        Ok(())
    }

    /// The stored bytes for `key`, or `None` if the key was never set.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let h = self.handles.as_ref().ok_or(Error::NotOpen)?;
        h.kv.query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![key.as_bytes()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| Error::Database(e.to_string()))
    }

    /// Store `value`'s string representation under `key`, overwriting any
    /// prior value (last write wins).
    pub fn set(&mut self, key: &str, value: impl std::fmt::Display) -> Result<()> {
        let h = self.handles.as_ref().ok_or(Error::NotOpen)?;
        h.kv.execute(
            "REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key.as_bytes(), value.to_string().as_bytes()],
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    /// Execute `sql` on the relational handle and return all resulting rows
    /// (empty for DDL or a no-match SELECT).
    ///
    /// The prepared statement is scoped to this call and released on every
    /// exit path before the result returns or propagates. The connection
    /// runs in auto-commit mode, so any mutation implied by the statement is
    /// committed by the time this returns.
    pub fn query(&mut self, sql: &str) -> Result<Vec<Row>> {
        let h = self.handles.as_ref().ok_or(Error::NotOpen)?;
        let mut stmt = h
            .sql
            .prepare(sql)
            .map_err(|e| Error::Database(e.to_string()))?;
        let column_count = stmt.column_count();

        let mut rows = stmt.query([]).map_err(|e| Error::Database(e.to_string()))?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().map_err(|e| Error::Database(e.to_string()))? {
            let mut values = Vec::with_capacity(column_count);
            for idx in 0..column_count {
                let value = row
                    .get_ref(idx)
                    .map_err(|e| Error::Database(e.to_string()))?;
                values.push(SqlValue::from(value));
            }
            results.push(values);
        }
        Ok(results)
    }

    /// Release both handles if open; a no-op when already closed.
    pub fn close(&mut self) {
        if self.handles.take().is_some() {
            debug!("closed store at {}", self.path.display());
        }
    }

    /// Scoped use: open on entry, run `f`, and close on exit including the
    /// closure's error path. Dropping an open `Database` also releases both
    /// handles.
    pub fn with<T>(path: impl AsRef<Path>, f: impl FnOnce(&mut Database) -> Result<T>) -> Result<T> {
        let mut db = Database::new(path);
        db.open()?;
        let result = f(&mut db);
        db.close();
        result
    }
}
