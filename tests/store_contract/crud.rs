//! Add / Update / Delete / Get semantics

use crate::common::*;
use agenda::{ErrorKind, OwnerId, Record, RecordId, RecordStore, StoreError};

#[test]
fn add_then_get_returns_same_record() {
    let store = TestStore::new();
    let record = record_at(OwnerId::new(), ts("2024-01-10T10:00:00"), "standup");
    store.add(record.clone()).unwrap();
    assert_eq!(store.get(record.id).unwrap(), record);
}

#[test]
fn duplicate_add_leaves_first_record() {
    let store = TestStore::new();
    let owner = OwnerId::new();
    let first = record_at(owner, ts("2024-01-10T10:00:00"), "first");
    let imposter = Record::with_id(first.id, owner, ts("2025-01-01T00:00:00"), "x", "second");

    store.add(first.clone()).unwrap();
    let err = store.add(imposter).unwrap_err();
    assert_eq!(err, StoreError::AlreadyExists(first.id));
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(store.get(first.id).unwrap(), first);
    assert_eq!(store.len(), 1);
}

#[test]
fn update_replaces_whole_record() {
    let store = TestStore::new();
    let owner = OwnerId::new();
    let original = record_at(owner, ts("2024-03-01T09:00:00"), "draft");
    store.add(original.clone()).unwrap();

    let other_owner = OwnerId::new();
    let replacement = Record::with_id(
        original.id,
        other_owner,
        ts("2024-03-02T15:30:00"),
        "new place",
        "final",
    );
    store.update(replacement.clone()).unwrap();

    assert_eq!(store.get(original.id).unwrap(), replacement);
    assert!(store
        .events_for_day(owner, ts("2024-03-01T00:00:00"))
        .is_empty());
    assert_eq!(
        store.events_for_day(other_owner, ts("2024-03-02T00:00:00")),
        vec![replacement]
    );
}

#[test]
fn update_absent_is_not_found() {
    let store = TestStore::new();
    let record = record_at(OwnerId::new(), ts("2024-01-01T00:00:00"), "ghost");
    let err = store.update(record.clone()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.record_id(), record.id);
    assert!(store.is_empty());
}

#[test]
fn delete_then_get_is_not_found() {
    let store = TestStore::new();
    let record = record_at(OwnerId::new(), ts("2024-01-01T12:00:00"), "temp");
    store.add(record.clone()).unwrap();
    store.delete(record.id).unwrap();

    assert_eq!(store.get(record.id), Err(StoreError::NotFound(record.id)));
    assert_eq!(store.delete(record.id), Err(StoreError::NotFound(record.id)));
}

#[test]
fn absent_ids_never_alias() {
    let store = TestStore::new();
    let owner = OwnerId::new();
    let records: Vec<Record> = (0..50)
        .map(|i| record_at(owner, midnight(2024, 1, 1 + i % 28), &format!("r{}", i)))
        .collect();
    for r in &records {
        store.add(r.clone()).unwrap();
    }

    for r in &records {
        assert_eq!(store.get(r.id).unwrap().id, r.id);
    }
    let stranger = RecordId::new();
    assert!(store.get(stranger).unwrap_err().is_not_found());
}

#[test]
fn re_add_after_delete_succeeds() {
    let store = TestStore::new();
    let record = record_at(OwnerId::new(), ts("2024-07-04T18:00:00"), "fireworks");
    store.add(record.clone()).unwrap();
    store.delete(record.id).unwrap();
    store.add(record.clone()).unwrap();
    assert_eq!(store.get(record.id).unwrap(), record);
}
