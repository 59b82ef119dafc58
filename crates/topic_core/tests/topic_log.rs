use chrono::{DateTime, Duration, TimeZone, Utc};
use rusqlite::Connection;
use topic_core::db::{open_db, open_db_in_memory};
use topic_core::{
    EntryStore, ManualClock, SqliteEntryStore, StorageError, TopicError, TopicLog,
};

fn t0() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

#[test]
fn append_then_recent_returns_the_new_label() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(t0());
    let log = TopicLog::new(SqliteEntryStore::new(&conn), &clock);

    let appended = log.append("writing docs").unwrap();
    assert_eq!(appended.start, t0());

    let recent = log.recent().unwrap();
    assert_eq!(recent.entry.label, "writing docs");
    assert_eq!(recent.entry.start, t0());
    assert!(recent.open);
    assert_eq!(recent.duration, Duration::zero());
}

#[test]
fn append_with_system_clock_stamps_call_time() {
    let conn = open_db_in_memory().unwrap();
    let log = TopicLog::with_system_clock(SqliteEntryStore::new(&conn));

    let before = Utc::now() - Duration::milliseconds(1);
    log.append("wall clock").unwrap();
    let after = Utc::now();

    let recent = log.recent().unwrap();
    assert!(recent.entry.start >= before && recent.entry.start <= after);
    assert_eq!(recent.entry.label, "wall clock");
}

#[test]
fn report_preserves_append_order() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(t0());
    let log = TopicLog::new(SqliteEntryStore::new(&conn), &clock);

    let labels = ["inbox", "review PR", "lunch", "deep work", "standup"];
    for (i, label) in labels.iter().enumerate() {
        clock.advance(Duration::seconds(i as i64 * 7 + 1));
        log.append(*label).unwrap();
    }

    let report = log.report().unwrap();
    let reported: Vec<&str> = report.iter().map(|span| span.entry.label.as_str()).collect();
    assert_eq!(reported, labels);
    assert!(report
        .windows(2)
        .all(|pair| pair[0].entry.start <= pair[1].entry.start));
}

#[test]
fn closed_durations_come_from_the_next_start() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(t0());
    let log = TopicLog::new(SqliteEntryStore::new(&conn), &clock);

    log.append("A").unwrap();
    clock.advance(Duration::minutes(25));
    log.append("B").unwrap();
    clock.advance(Duration::minutes(5));
    log.append("C").unwrap();
    clock.advance(Duration::seconds(30));

    let report = log.report().unwrap();
    assert_eq!(report.len(), 3);

    assert_eq!(report[0].entry.label, "A");
    assert_eq!(report[0].duration, Duration::minutes(25));
    assert!(!report[0].open);

    assert_eq!(report[1].entry.label, "B");
    assert_eq!(report[1].duration, Duration::minutes(5));
    assert_eq!(report[1].end(), report[2].entry.start);
    assert!(!report[1].open);

    assert_eq!(report[2].entry.label, "C");
    assert_eq!(report[2].duration, Duration::seconds(30));
    assert!(report[2].open);
}

#[test]
fn open_duration_grows_between_queries() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(t0());
    let log = TopicLog::new(SqliteEntryStore::new(&conn), &clock);
    log.append("still going").unwrap();

    clock.set(t0() + Duration::seconds(10));
    let first = log.recent().unwrap();
    clock.set(t0() + Duration::seconds(95));
    let second = log.recent().unwrap();

    assert_eq!(first.duration, Duration::seconds(10));
    assert_eq!(second.duration, Duration::seconds(95));
    assert!(second.duration > first.duration);
    assert_eq!(first.entry, second.entry);

    let report = log.report().unwrap();
    assert_eq!(report[0].duration, Duration::seconds(95));
}

#[test]
fn appending_closes_the_previous_entry() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(t0());
    let log = TopicLog::new(SqliteEntryStore::new(&conn), &clock);

    log.append("first").unwrap();
    clock.advance(Duration::hours(1));
    let before = log.report().unwrap();
    assert!(before[0].open);

    log.append("second").unwrap();
    clock.advance(Duration::hours(3));
    let after = log.report().unwrap();
    assert!(!after[0].open);
    assert_eq!(after[0].duration, Duration::hours(1));
    assert_eq!(after[0].entry, before[0].entry);
}

#[test]
fn empty_log_reports_nothing_but_recent_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let log = TopicLog::new(SqliteEntryStore::new(&conn), ManualClock::new(t0()));

    assert!(log.report().unwrap().is_empty());
    assert!(matches!(log.recent().unwrap_err(), TopicError::NotFound));
}

#[test]
fn empty_label_is_a_valid_topic() {
    let conn = open_db_in_memory().unwrap();
    let log = TopicLog::new(SqliteEntryStore::new(&conn), ManualClock::new(t0()));

    log.append("").unwrap();
    assert_eq!(log.recent().unwrap().entry.label, "");
}

#[test]
fn storage_failures_propagate_unchanged() {
    let conn = Connection::open_in_memory().unwrap();
    let log = TopicLog::new(SqliteEntryStore::new(&conn), ManualClock::new(t0()));

    assert!(matches!(
        log.recent().unwrap_err(),
        TopicError::Storage(StorageError::Db(_))
    ));
    assert!(matches!(
        log.report().unwrap_err(),
        TopicError::Storage(StorageError::Db(_))
    ));
    assert!(matches!(
        log.append("x").unwrap_err(),
        TopicError::Storage(StorageError::Db(_))
    ));
}

#[test]
fn nul_label_is_a_storage_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let log = TopicLog::new(SqliteEntryStore::new(&conn), ManualClock::new(t0()));

    let err = log.append("a\0b").unwrap_err();
    assert!(matches!(err, TopicError::Storage(StorageError::Validation(_))));
    assert_eq!(log.store().count().unwrap(), 0);
}

#[test]
fn separate_logs_stay_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let conn_work = open_db(dir.path().join("work.sqlite3")).unwrap();
    let conn_home = open_db(dir.path().join("home.sqlite3")).unwrap();
    let clock = ManualClock::new(t0());

    let work = TopicLog::new(SqliteEntryStore::new(&conn_work), &clock);
    let home = TopicLog::new(SqliteEntryStore::new(&conn_home), &clock);

    work.append("meeting").unwrap();
    assert!(home.report().unwrap().is_empty());
    assert!(matches!(home.recent().unwrap_err(), TopicError::NotFound));
    assert_eq!(work.report().unwrap().len(), 1);
}
