//! Entry store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist topic entries in an append-only, insertion-ordered sequence.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `TopicEntry::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Sequence order (`seq`) is the only ordering reads rely on.

use crate::db::DbError;
use crate::model::topic::{TopicEntry, TopicValidationError};
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ENTRY_SELECT_SQL: &str = "SELECT seq, start_ms, label FROM topic_entries";

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence failure: unreadable, unwritable or corrupt storage.
#[derive(Debug)]
pub enum StorageError {
    Validation(TopicValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted topic data: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<TopicValidationError> for StorageError {
    fn from(value: TopicValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Append-only persistence for the ordered topic sequence.
pub trait EntryStore {
    /// Writes `entry` after all existing entries and returns its sequence number.
    fn append_entry(&self, entry: &TopicEntry) -> StorageResult<i64>;
    /// Full sequence, oldest first. Empty when nothing was ever written.
    fn read_all(&self) -> StorageResult<Vec<TopicEntry>>;
    /// Last entry by insertion order.
    fn read_last(&self) -> StorageResult<Option<TopicEntry>>;
    fn count(&self) -> StorageResult<u64>;
}

impl<S: EntryStore + ?Sized> EntryStore for &S {
    fn append_entry(&self, entry: &TopicEntry) -> StorageResult<i64> {
        (**self).append_entry(entry)
    }

    fn read_all(&self) -> StorageResult<Vec<TopicEntry>> {
        (**self).read_all()
    }

    fn read_last(&self) -> StorageResult<Option<TopicEntry>> {
        (**self).read_last()
    }

    fn count(&self) -> StorageResult<u64> {
        (**self).count()
    }
}

/// SQLite-backed entry store.
pub struct SqliteEntryStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryStore<'conn> {
    /// Wraps a connection returned by `db::open_db*` (migrations applied).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntryStore for SqliteEntryStore<'_> {
    fn append_entry(&self, entry: &TopicEntry) -> StorageResult<i64> {
        entry.validate()?;

        // IMMEDIATE takes the write lock up front; the guard rolls back on
        // every early return.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO topic_entries (start_ms, label) VALUES (?1, ?2);",
            params![entry.start_epoch_ms(), entry.label.as_str()],
        )?;
        let seq = tx.last_insert_rowid();
        tx.commit()?;

        debug!(
            "event=entry_append module=repo status=ok seq={} start_ms={}",
            seq,
            entry.start_epoch_ms()
        );
        Ok(seq)
    }

    fn read_all(&self) -> StorageResult<Vec<TopicEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        debug!(
            "event=entry_read_all module=repo status=ok entries={}",
            entries.len()
        );
        Ok(entries)
    }

    fn read_last(&self) -> StorageResult<Option<TopicEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} ORDER BY seq DESC LIMIT 1;"))?;
        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn count(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM topic_entries;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| StorageError::InvalidData(format!("negative entry count `{count}`")))
    }
}

fn parse_entry_row(row: &Row<'_>) -> StorageResult<TopicEntry> {
    let seq: i64 = row.get("seq")?;
    let start_ms: i64 = row.get("start_ms")?;
    let start: DateTime<Utc> = DateTime::from_timestamp_millis(start_ms).ok_or_else(|| {
        StorageError::InvalidData(format!(
            "start_ms `{start_ms}` out of range in topic_entries.seq={seq}"
        ))
    })?;

    let entry = TopicEntry {
        start,
        label: row.get("label")?,
    };
    entry.validate().map_err(|err| {
        StorageError::InvalidData(format!("{err} in topic_entries.seq={seq}"))
    })?;
    Ok(entry)
}
