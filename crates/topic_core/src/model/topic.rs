//! Topic entry domain model.
//!
//! # Responsibility
//! - Define the canonical record for "what I was doing and since when".
//! - Provide the span shape returned by log queries.
//!
//! # Invariants
//! - `start` carries no sub-millisecond component.
//! - `label` never contains a NUL character.
//! - A span duration is never negative.

use chrono::{DateTime, Duration, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation errors for topic entry invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicValidationError {
    /// Label contains a NUL character, which text storage cannot round-trip.
    ContainsNul,
}

impl Display for TopicValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContainsNul => write!(f, "topic label must not contain NUL characters"),
        }
    }
}

impl Error for TopicValidationError {}

/// One persisted topic: a label and the instant it started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TopicEntryWire")]
pub struct TopicEntry {
    /// Start instant, UTC, truncated to whole milliseconds.
    pub start: DateTime<Utc>,
    /// Free-form description; empty means "no active description".
    pub label: String,
}

#[derive(Deserialize)]
struct TopicEntryWire {
    start: DateTime<Utc>,
    label: String,
}

impl TryFrom<TopicEntryWire> for TopicEntry {
    type Error = TopicValidationError;

    fn try_from(value: TopicEntryWire) -> Result<Self, Self::Error> {
        let entry = Self::new(value.start, value.label);
        entry.validate()?;
        Ok(entry)
    }
}

impl TopicEntry {
    /// Creates an entry, truncating `start` to the store's millisecond resolution.
    pub fn new(start: DateTime<Utc>, label: impl Into<String>) -> Self {
        Self {
            start: truncate_to_millis(start),
            label: label.into(),
        }
    }

    /// Start instant as Unix epoch milliseconds.
    pub fn start_epoch_ms(&self) -> i64 {
        self.start.timestamp_millis()
    }

    /// Checks entry invariants before persistence.
    ///
    /// # Errors
    /// - `ContainsNul` when the label has an embedded NUL.
    pub fn validate(&self) -> Result<(), TopicValidationError> {
        if self.label.contains('\0') {
            return Err(TopicValidationError::ContainsNul);
        }
        Ok(())
    }

    /// Time elapsed from `start` until `until`, clamped at zero.
    pub fn elapsed_until(&self, until: DateTime<Utc>) -> Duration {
        (until - self.start).max(TimeDelta::zero())
    }
}

/// An entry paired with its derived duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSpan {
    pub entry: TopicEntry,
    /// `next.start - entry.start` for closed spans, `now - entry.start` for
    /// the open one.
    pub duration: Duration,
    /// True only for the last entry in the log.
    pub open: bool,
}

impl TopicSpan {
    /// Instant the span ended, or the evaluation time for the open span.
    pub fn end(&self) -> DateTime<Utc> {
        self.entry.start + self.duration
    }
}

fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    // Only fails for instants near the representable range limits.
    value
        .duration_trunc(TimeDelta::milliseconds(1))
        .unwrap_or(value)
}
