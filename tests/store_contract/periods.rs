//! Range query windows: inclusive at both ends, per owner

use crate::common::*;
use agenda::{OwnerId, Period, RecordStore};

#[test]
fn week_window_includes_record_seven_days_later() {
    let store = TestStore::new();
    let u = OwnerId::new();
    let a = record_at(u, ts("2024-01-10T10:00:00"), "A");
    let b = record_at(u, ts("2024-01-17T10:00:00"), "B");
    store.add(a.clone()).unwrap();
    store.add(b.clone()).unwrap();

    let week = store.get_by_period(u, ts("2024-01-10T00:00:00"), Period::Week);
    assert_eq!(week, vec![a, b]);
}

#[test]
fn day_window_includes_next_day() {
    let store = TestStore::new();
    let u = OwnerId::new();
    let start = ts("2024-02-28T00:00:00");
    let same = record_at(u, ts("2024-02-28T08:00:00"), "same day");
    let next = record_at(u, ts("2024-02-29T00:00:00"), "exactly one day later");
    let after = record_at(u, ts("2024-03-01T00:00:00"), "two days later");
    for r in [&same, &next, &after] {
        store.add(r.clone()).unwrap();
    }

    assert_eq!(store.events_for_day(u, start), vec![same, next]);
}

#[test]
fn start_is_inclusive_and_earlier_excluded() {
    let store = TestStore::new();
    let u = OwnerId::new();
    let start = ts("2024-05-05T12:00:00");
    let at_start = record_at(u, start, "on the dot");
    let before = record_at(u, ts("2024-05-05T11:59:59"), "one second early");
    store.add(at_start.clone()).unwrap();
    store.add(before).unwrap();

    assert_eq!(store.events_for_day(u, start), vec![at_start]);
}

#[test]
fn month_window_includes_same_day_next_month() {
    let store = TestStore::new();
    let u = OwnerId::new();
    let start = ts("2024-04-15T00:00:00");
    let inside = record_at(u, ts("2024-05-15T09:00:00"), "one month later");
    let outside = record_at(u, ts("2024-05-16T00:00:00"), "too late");
    store.add(inside.clone()).unwrap();
    store.add(outside).unwrap();

    assert_eq!(store.events_for_month(u, start), vec![inside]);
}

#[test]
fn month_window_overflows_short_months() {
    let store = TestStore::new();
    let u = OwnerId::new();
    // 2023-01-31 + 1 month normalizes to 2023-03-03
    let start = ts("2023-01-31T00:00:00");
    let edge = record_at(u, ts("2023-03-03T23:00:00"), "last included day");
    let beyond = record_at(u, ts("2023-03-04T00:00:00"), "first excluded day");
    store.add(edge.clone()).unwrap();
    store.add(beyond).unwrap();

    assert_eq!(store.events_for_month(u, start), vec![edge]);
}

#[test]
fn windows_cross_year_boundary() {
    let store = TestStore::new();
    let u = OwnerId::new();
    let nye = record_at(u, ts("2021-12-31T22:00:00"), "party");
    let jan3 = record_at(u, ts("2022-01-03T09:00:00"), "back to work");
    let feb = record_at(u, ts("2022-02-01T09:00:00"), "february");
    for r in [&nye, &jan3, &feb] {
        store.add(r.clone()).unwrap();
    }

    let start = ts("2021-12-31T00:00:00");
    assert_eq!(store.events_for_week(u, start).len(), 2);
    assert_eq!(store.events_for_month(u, start).len(), 2);
    assert_eq!(store.events_for_day(u, start), vec![nye]);
}

#[test]
fn other_owners_are_invisible() {
    let store = TestStore::new();
    let mine = OwnerId::new();
    let theirs = OwnerId::new();
    let when = ts("2024-09-09T09:09:09");
    store.add(record_at(theirs, when, "not mine")).unwrap();

    assert!(store.events_for_week(mine, midnight(2024, 9, 9)).is_empty());
    assert_eq!(store.events_for_week(theirs, midnight(2024, 9, 9)).len(), 1);
}

#[test]
fn empty_result_is_not_an_error() {
    let store = TestStore::new();
    for period in Period::ALL {
        assert!(store
            .get_by_period(OwnerId::new(), midnight(2030, 1, 1), period)
            .is_empty());
    }
}

#[test]
fn results_ordered_by_time() {
    let store = TestStore::new();
    let u = OwnerId::new();
    let late = record_at(u, ts("2024-06-03T18:00:00"), "late");
    let early = record_at(u, ts("2024-06-01T07:00:00"), "early");
    let mid = record_at(u, ts("2024-06-02T12:00:00"), "mid");
    for r in [&late, &early, &mid] {
        store.add(r.clone()).unwrap();
    }

    let week = store.events_for_week(u, midnight(2024, 6, 1));
    assert_eq!(week, vec![early, mid, late]);
}
