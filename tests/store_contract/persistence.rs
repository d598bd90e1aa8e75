//! Read-after-write and reload behaviour through the public surface

use crate::common::*;
use agenda::{FlushOutcome, LifecycleState, OpenError, OwnerId, RecordStore, Store, StoreConfig};
use std::time::Duration;

#[test]
fn queries_see_writes_before_any_flush() {
    let store = TestStore::new();
    let u = OwnerId::new();
    let record = record_at(u, ts("2024-01-10T10:00:00"), "unflushed");
    store.add(record.clone()).unwrap();

    assert!(store.is_dirty());
    assert!(!store.snapshot_path().exists());
    assert_eq!(store.events_for_day(u, midnight(2024, 1, 10)), vec![record]);
}

#[test]
fn reopen_restores_contents() {
    let store = TestStore::new();
    let u = OwnerId::new();
    let a = record_at(u, ts("2024-01-10T10:00:00"), "A");
    let b = record_at(u, ts("2024-01-17T10:00:00"), "B");
    store.add(a.clone()).unwrap();
    store.add(b.clone()).unwrap();

    let store = store.reopen();
    assert_eq!(store.len(), 2);
    assert_eq!(
        store.events_for_week(u, midnight(2024, 1, 10)),
        vec![a, b]
    );
}

#[test]
fn lifecycle_states_progress() {
    let store = TestStore::new();
    assert_eq!(store.state(), LifecycleState::Running);
    store.close();
    assert_eq!(store.state(), LifecycleState::Stopped);
    assert_eq!(store.flush().unwrap(), FlushOutcome::Closed);
}

#[test]
fn open_fails_when_path_is_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = Store::open(StoreConfig::new(dir.path())).unwrap_err();
    assert!(matches!(err, OpenError::NotAFile(_)));
}

#[test]
fn open_fails_when_parent_cannot_be_created() {
    let dir = tempfile::TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"file, not dir").unwrap();

    let err = Store::open(
        StoreConfig::new(blocker.join("events.snap")).with_flush_interval(Duration::from_secs(1)),
    )
    .unwrap_err();
    assert!(matches!(err, OpenError::Io { .. }));
}
