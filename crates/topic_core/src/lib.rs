//! Core domain logic for the `topic` activity tracker.
//! This crate owns the topic log: entries, append-only storage and
//! duration derivation. Output formatting lives with the callers.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ConfigOverrides, TopicConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::topic::{TopicEntry, TopicSpan, TopicValidationError};
pub use repo::entry_repo::{EntryStore, SqliteEntryStore, StorageError, StorageResult};
pub use service::topic_service::{compute_spans, TopicError, TopicLog, TopicResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
