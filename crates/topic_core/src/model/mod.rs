//! Domain model for the topic log.
//!
//! # Responsibility
//! - Define the persisted topic entry and the derived span shape.
//! - Keep duration a derived value, never a stored one.
//!
//! # Invariants
//! - Entries are append-only; nothing in this module mutates a stored entry.
//! - Entry timestamps are UTC with millisecond resolution.

pub mod topic;
