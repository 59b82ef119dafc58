use chrono::{DateTime, Duration, TimeZone, Utc};
use rusqlite::Connection;
use topic_core::db::{open_db, open_db_in_memory};
use topic_core::{
    EntryStore, SqliteEntryStore, StorageError, TopicEntry, TopicValidationError,
};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

#[test]
fn empty_store_reads_as_empty() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteEntryStore::new(&conn);

    assert!(store.read_all().unwrap().is_empty());
    assert_eq!(store.read_last().unwrap(), None);
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn append_and_read_all_roundtrip_preserves_labels() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteEntryStore::new(&conn);

    let labels = [
        "writing docs",
        "",
        "  padded, with: punctuation!? ",
        "line one\nline two\ttabbed",
        "naïve café ☕ review",
    ];
    let written: Vec<TopicEntry> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| TopicEntry::new(at(i as i64 * 30), *label))
        .collect();

    for entry in &written {
        store.append_entry(entry).unwrap();
    }

    assert_eq!(store.read_all().unwrap(), written);
    assert_eq!(store.count().unwrap(), labels.len() as u64);
}

#[test]
fn roundtrip_keeps_millisecond_resolution() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteEntryStore::new(&conn);

    let start = Utc.timestamp_opt(1_700_000_000, 987_654_321).unwrap();
    let entry = TopicEntry::new(start, "precise");
    store.append_entry(&entry).unwrap();

    let loaded = store.read_last().unwrap().unwrap();
    assert_eq!(loaded, entry);
    assert_eq!(loaded.start, Utc.timestamp_opt(1_700_000_000, 987_000_000).unwrap());
}

#[test]
fn append_returns_increasing_sequence_numbers() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteEntryStore::new(&conn);

    let first = store.append_entry(&TopicEntry::new(at(0), "a")).unwrap();
    let second = store.append_entry(&TopicEntry::new(at(1), "b")).unwrap();
    assert!(second > first);
}

#[test]
fn reads_follow_insertion_order_not_start_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteEntryStore::new(&conn);

    store.append_entry(&TopicEntry::new(at(100), "late clock")).unwrap();
    store.append_entry(&TopicEntry::new(at(50), "skewed clock")).unwrap();

    let labels: Vec<String> = store
        .read_all()
        .unwrap()
        .into_iter()
        .map(|entry| entry.label)
        .collect();
    assert_eq!(labels, vec!["late clock", "skewed clock"]);
    assert_eq!(store.read_last().unwrap().unwrap().label, "skewed clock");
}

#[test]
fn nul_label_is_rejected_before_write() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteEntryStore::new(&conn);

    let err = store
        .append_entry(&TopicEntry::new(at(0), "bad\0label"))
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Validation(TopicValidationError::ContainsNul)
    ));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn stored_rows_cannot_be_updated_or_deleted() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteEntryStore::new(&conn);
    store.append_entry(&TopicEntry::new(at(0), "audit")).unwrap();

    let update = conn.execute("UPDATE topic_entries SET label = 'rewritten';", []);
    assert!(update.is_err());
    let delete = conn.execute("DELETE FROM topic_entries;", []);
    assert!(delete.is_err());

    assert_eq!(store.read_all().unwrap(), vec![TopicEntry::new(at(0), "audit")]);
}

#[test]
fn corrupt_timestamp_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO topic_entries (start_ms, label) VALUES (?1, 'broken');",
        [i64::MAX],
    )
    .unwrap();
    let store = SqliteEntryStore::new(&conn);

    let err = store.read_all().unwrap_err();
    assert!(
        matches!(&err, StorageError::InvalidData(message) if message.contains("start_ms")),
        "unexpected error: {err}"
    );
}

#[test]
fn entries_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("topic.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteEntryStore::new(&conn);
        store.append_entry(&TopicEntry::new(at(0), "before restart")).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteEntryStore::new(&conn);
    store
        .append_entry(&TopicEntry::new(at(0) + Duration::minutes(5), "after restart"))
        .unwrap();

    let labels: Vec<String> = store
        .read_all()
        .unwrap()
        .into_iter()
        .map(|entry| entry.label)
        .collect();
    assert_eq!(labels, vec!["before restart", "after restart"]);
}

#[test]
fn appends_from_two_connections_interleave_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("topic.sqlite3");

    let conn_a = open_db(&path).unwrap();
    let conn_b = open_db(&path).unwrap();
    let store_a = SqliteEntryStore::new(&conn_a);
    let store_b = SqliteEntryStore::new(&conn_b);

    store_a.append_entry(&TopicEntry::new(at(0), "a1")).unwrap();
    store_b.append_entry(&TopicEntry::new(at(1), "b1")).unwrap();
    store_a.append_entry(&TopicEntry::new(at(2), "a2")).unwrap();

    let labels: Vec<String> = store_b
        .read_all()
        .unwrap()
        .into_iter()
        .map(|entry| entry.label)
        .collect();
    assert_eq!(labels, vec!["a1", "b1", "a2"]);
}

#[test]
fn missing_table_surfaces_as_db_error() {
    let conn = Connection::open_in_memory().unwrap();
    let store = SqliteEntryStore::new(&conn);

    let err = store.read_all().unwrap_err();
    assert!(matches!(err, StorageError::Db(_)), "unexpected error: {err}");
}
