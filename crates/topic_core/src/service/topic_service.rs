//! Topic log use-case service.
//!
//! # Responsibility
//! - Provide the append/recent/report entry points for core callers.
//! - Derive per-entry durations from adjacent start timestamps.
//!
//! # Invariants
//! - Closed span duration is `next.start - start`; the open span (last
//!   entry) is measured against the injected clock at query time.
//! - An empty log is a valid report (no spans) but an error for `recent`.
//! - Store failures are returned unchanged; nothing is retried.

use crate::clock::{Clock, SystemClock};
use crate::model::topic::{TopicEntry, TopicSpan};
use crate::repo::entry_repo::{EntryStore, StorageError};
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TopicResult<T> = Result<T, TopicError>;

/// Error returned by topic log operations.
#[derive(Debug)]
pub enum TopicError {
    /// `recent` was called before any topic was ever set.
    NotFound,
    /// Persistence-layer failure.
    Storage(StorageError),
}

impl Display for TopicError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "no topic has been set yet"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TopicError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for TopicError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// The topic log engine over an explicit store and clock.
pub struct TopicLog<S: EntryStore, C: Clock> {
    store: S,
    clock: C,
}

impl<S: EntryStore> TopicLog<S, SystemClock> {
    pub fn with_system_clock(store: S) -> Self {
        Self::new(store, SystemClock)
    }
}

impl<S: EntryStore, C: Clock> TopicLog<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Records `label` as the current topic, starting now.
    ///
    /// # Contract
    /// - The previous entry is not touched; it becomes closed implicitly.
    /// - Empty labels are accepted.
    /// - Returns the entry exactly as persisted.
    pub fn append(&self, label: impl Into<String>) -> TopicResult<TopicEntry> {
        let entry = TopicEntry::new(self.clock.now(), label);
        let seq = self.store.append_entry(&entry)?;
        info!(
            "event=topic_append module=service status=ok seq={} label_chars={}",
            seq,
            entry.label.chars().count()
        );
        Ok(entry)
    }

    /// Returns the latest topic with its open duration.
    ///
    /// # Errors
    /// - `NotFound` when the log is empty.
    /// - `Storage` when the store cannot be read.
    pub fn recent(&self) -> TopicResult<TopicSpan> {
        let entry = self.store.read_last()?.ok_or(TopicError::NotFound)?;
        let now = self.clock.now();
        Ok(TopicSpan {
            duration: entry.elapsed_until(now),
            entry,
            open: true,
        })
    }

    /// Returns every entry oldest-first, paired with its duration.
    pub fn report(&self) -> TopicResult<Vec<TopicSpan>> {
        let entries = self.store.read_all()?;
        let spans = compute_spans(entries, self.clock.now());
        debug!(
            "event=topic_report module=service status=ok entries={}",
            spans.len()
        );
        Ok(spans)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

/// Pairs each entry with its duration using the adjacent-entry rule.
///
/// `entries` must be in insertion order. Every entry but the last is closed
/// by its successor's start; the last stays open and is measured to `now`.
pub fn compute_spans(entries: Vec<TopicEntry>, now: DateTime<Utc>) -> Vec<TopicSpan> {
    let next_starts: Vec<Option<DateTime<Utc>>> = entries
        .iter()
        .skip(1)
        .map(|next| Some(next.start))
        .chain(std::iter::once(None))
        .collect();

    entries
        .into_iter()
        .zip(next_starts)
        .map(|(entry, next_start)| match next_start {
            Some(end) => TopicSpan {
                duration: entry.elapsed_until(end),
                entry,
                open: false,
            },
            None => TopicSpan {
                duration: entry.elapsed_until(now),
                entry,
                open: true,
            },
        })
        .collect()
}
