//! Butler Store — dual-backend key-value/query store, the inventory ledger,
//! and the household calendar.

pub mod calendar;
pub mod db;
pub mod inventory;
pub mod types;

pub use calendar::{CalendarEvent, CalendarStore, EventsByDay, DEFAULT_CALENDAR_ID};
pub use db::Database;
pub use inventory::{InventoryStore, Item};
pub use types::{Row, SqlValue};
