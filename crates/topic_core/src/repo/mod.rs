//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the append-only entry store contract.
//! - Isolate SQLite query details from the topic log engine.
//!
//! # Invariants
//! - Store writes must enforce `TopicEntry::validate()` before persistence.
//! - Stores never rewrite or remove an entry once appended.

pub mod entry_repo;
