//! Household calendar: one default calendar and its events.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, TimeZone, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use butler_core::{Error, Result};

/// Every event belongs to the seeded default calendar until multi-calendar
/// support exists.
pub const DEFAULT_CALENDAR_ID: i64 = 1;

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS calendars (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS calendar_events (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    start_time  TEXT NOT NULL,
    end_time    TEXT,
    all_day     INTEGER NOT NULL DEFAULT 0,
    location    TEXT NOT NULL DEFAULT '',
    calendar_id INTEGER NOT NULL DEFAULT 1
);";

/// A single calendar event. `end_time` is absent for open-ended and all-day
/// events.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub all_day: bool,
    pub location: String,
    pub calendar_id: i64,
}

/// Events of one month keyed by day of month, each day in start order.
pub type EventsByDay = BTreeMap<u32, Vec<CalendarEvent>>;

/// Shared calendar store. Same mutex-guarded connection shape as
/// [`crate::InventoryStore`]; both live in the server-owned SQLite file.
pub struct CalendarStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl CalendarStore {
    /// Open or create the calendar tables at `db_path` and seed the default
    /// calendar.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::Storage(e.to_string()))?;
        }

        let conn = Connection::open(&db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;
        conn.execute(
            "INSERT OR IGNORE INTO calendars (id, name) VALUES (?1, 'Default')",
            params![DEFAULT_CALENDAR_ID],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };
        info!(
            "CalendarStore initialized: path={}",
            store.db_path.display()
        );
        Ok(store)
    }

    /// Look up one event by id.
    pub fn get_event(&self, id: i64) -> Result<Option<CalendarEvent>> {
        let conn = self.conn.lock();
        Self::get_event_in(&conn, id)
    }

    /// Upsert: an event whose id matches an existing row is updated in place,
    /// anything else is inserted with a fresh id. Returns the stored event.
    pub fn upsert_event(&self, event: &CalendarEvent) -> Result<CalendarEvent> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| Error::Database(e.to_string()))?;

        let id = match Self::get_event_in(&tx, event.id)? {
            Some(existing) => {
                tx.execute(
                    "UPDATE calendar_events SET
                        title = ?1, description = ?2, start_time = ?3, end_time = ?4,
                        all_day = ?5, location = ?6, calendar_id = ?7
                     WHERE id = ?8",
                    params![
                        event.title,
                        event.description,
                        event.start_time,
                        event.end_time,
                        event.all_day,
                        event.location,
                        event.calendar_id,
                        existing.id,
                    ],
                )
                .map_err(|e| Error::Database(e.to_string()))?;
                existing.id
            }
            None => {
                tx.execute(
                    "INSERT INTO calendar_events
                        (title, description, start_time, end_time, all_day, location, calendar_id)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        event.title,
                        event.description,
                        event.start_time,
                        event.end_time,
                        event.all_day,
                        event.location,
                        event.calendar_id,
                    ],
                )
                .map_err(|e| Error::Database(e.to_string()))?;
                tx.last_insert_rowid()
            }
        };
        tx.commit().map_err(|e| Error::Database(e.to_string()))?;

        Self::get_event_in(&conn, id)?
            .ok_or_else(|| Error::Database(format!("event {} missing after upsert", id)))
    }

    /// Delete one event. Returns whether a row was actually removed.
    pub fn delete_event(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock();
        let affected = conn
            .execute("DELETE FROM calendar_events WHERE id = ?1", params![id])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(affected > 0)
    }

    /// All events of `calendar_id` starting within the given month, grouped
    /// by day of month. The window is half-open: an event starting exactly at
    /// the next month's midnight belongs to the next month.
    pub fn events_for_month(
        &self,
        calendar_id: i64,
        year: i32,
        month: u32,
    ) -> Result<EventsByDay> {
        let start = month_start(year, month)?;
        let end = if month == 12 {
            month_start(year + 1, 1)?
        } else {
            month_start(year, month + 1)?
        };

        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT id, title, description, start_time, end_time, all_day, location, calendar_id
                 FROM calendar_events
                 WHERE calendar_id = ?1 AND start_time >= ?2 AND start_time < ?3
                 ORDER BY start_time",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![calendar_id, start, end], Self::row_to_event)
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut by_day = EventsByDay::new();
        for event in rows.filter_map(|r| r.ok()) {
            by_day
                .entry(event.start_time.day())
                .or_default()
                .push(event);
        }
        Ok(by_day)
    }

    fn get_event_in(conn: &Connection, id: i64) -> Result<Option<CalendarEvent>> {
        conn.prepare_cached(
            "SELECT id, title, description, start_time, end_time, all_day, location, calendar_id
             FROM calendar_events WHERE id = ?1",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .query_row(params![id], Self::row_to_event)
        .optional()
        .map_err(|e| Error::Database(e.to_string()))
    }

    fn row_to_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<CalendarEvent> {
        Ok(CalendarEvent {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
            all_day: row.get(5)?,
            location: row.get(6)?,
            calendar_id: row.get(7)?,
        })
    }
}

fn month_start(year: i32, month: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| Error::Storage(format!("invalid month {}-{}", year, month)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (CalendarStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = CalendarStore::open(dir.path().join("butler.db")).unwrap();
        (store, dir)
    }

    fn event(title: &str, start: DateTime<Utc>) -> CalendarEvent {
        CalendarEvent {
            id: 0,
            title: title.into(),
            description: String::new(),
            start_time: start,
            end_time: None,
            all_day: false,
            location: String::new(),
            calendar_id: DEFAULT_CALENDAR_ID,
        }
    }

    fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_upsert_inserts_with_fresh_id() {
        let (store, _dir) = test_store();

        let stored = store
            .upsert_event(&event("Dentist", at(2026, 8, 10, 14)))
            .unwrap();
        assert!(stored.id > 0);
        assert_eq!(stored.title, "Dentist");
        assert_eq!(stored.calendar_id, DEFAULT_CALENDAR_ID);
    }

    #[test]
    fn test_upsert_existing_updates_in_place() {
        let (store, _dir) = test_store();

        let stored = store
            .upsert_event(&event("Dentist", at(2026, 8, 10, 14)))
            .unwrap();
        let mut changed = stored.clone();
        changed.title = "Dentist (moved)".into();
        changed.start_time = at(2026, 8, 11, 9);

        let updated = store.upsert_event(&changed).unwrap();
        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.title, "Dentist (moved)");

        // Still a single row.
        let august = store
            .events_for_month(DEFAULT_CALENDAR_ID, 2026, 8)
            .unwrap();
        assert_eq!(august.values().map(Vec::len).sum::<usize>(), 1);
    }

    #[test]
    fn test_get_absent_is_none() {
        let (store, _dir) = test_store();

        assert!(store.get_event(999).unwrap().is_none());
    }

    #[test]
    fn test_delete_reports_whether_removed() {
        let (store, _dir) = test_store();

        let stored = store
            .upsert_event(&event("Conference", at(2026, 8, 20, 0)))
            .unwrap();
        assert!(store.delete_event(stored.id).unwrap());
        assert!(!store.delete_event(stored.id).unwrap());
        assert!(store.get_event(stored.id).unwrap().is_none());
    }

    #[test]
    fn test_events_for_month_groups_by_day() {
        let (store, _dir) = test_store();

        store
            .upsert_event(&event("Morning meeting", at(2026, 8, 10, 9)))
            .unwrap();
        store
            .upsert_event(&event("Evening meeting", at(2026, 8, 10, 18)))
            .unwrap();
        store
            .upsert_event(&event("Conference", at(2026, 8, 20, 0)))
            .unwrap();
        store
            .upsert_event(&event("Next month", at(2026, 9, 1, 0)))
            .unwrap();

        let august = store
            .events_for_month(DEFAULT_CALENDAR_ID, 2026, 8)
            .unwrap();
        assert_eq!(august.keys().copied().collect::<Vec<_>>(), vec![10, 20]);
        assert_eq!(august[&10].len(), 2);
        assert_eq!(august[&10][0].title, "Morning meeting");
        assert_eq!(august[&20][0].title, "Conference");
    }

    #[test]
    fn test_events_window_is_half_open() {
        let (store, _dir) = test_store();

        // Exactly midnight on the first of the next month.
        store
            .upsert_event(&event("Boundary", at(2026, 9, 1, 0)))
            .unwrap();

        let august = store
            .events_for_month(DEFAULT_CALENDAR_ID, 2026, 8)
            .unwrap();
        assert!(august.is_empty());
        let september = store
            .events_for_month(DEFAULT_CALENDAR_ID, 2026, 9)
            .unwrap();
        assert_eq!(september[&1][0].title, "Boundary");
    }

    #[test]
    fn test_december_window_wraps_year() {
        let (store, _dir) = test_store();

        store
            .upsert_event(&event("New year's eve", at(2026, 12, 31, 22)))
            .unwrap();
        store
            .upsert_event(&event("New year's day", at(2027, 1, 1, 0)))
            .unwrap();

        let december = store
            .events_for_month(DEFAULT_CALENDAR_ID, 2026, 12)
            .unwrap();
        assert_eq!(december.keys().copied().collect::<Vec<_>>(), vec![31]);
    }

    #[test]
    fn test_invalid_month_is_error() {
        let (store, _dir) = test_store();

        assert!(store
            .events_for_month(DEFAULT_CALENDAR_ID, 2026, 13)
            .is_err());
    }

    #[test]
    fn test_shares_file_with_inventory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("butler.db");
        let inventory = crate::InventoryStore::open(&path).unwrap();
        let calendar = CalendarStore::open(&path).unwrap();

        inventory.add("milk", 2.0, "liters").unwrap();
        calendar
            .upsert_event(&event("Groceries", at(2026, 8, 5, 10)))
            .unwrap();

        assert_eq!(inventory.list().unwrap().len(), 1);
        assert_eq!(
            calendar
                .events_for_month(DEFAULT_CALENDAR_ID, 2026, 8)
                .unwrap()
                .len(),
            1
        );
    }
}
