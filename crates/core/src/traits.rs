//! The record store contract
//!
//! Transport handlers, CLIs and tests talk to the store only through this
//! trait. Nothing about locking, flush timing or table layout is part of it.

use crate::error::StoreResult;
use crate::period::Period;
use crate::record::Record;
use crate::types::{OwnerId, RecordId};
use chrono::NaiveDateTime;

/// Keyed store of time-stamped records
///
/// Every operation is atomic with respect to every other operation. Range
/// queries observe one consistent instant of the table and never fail on an
/// empty result.
pub trait RecordStore: Send + Sync {
    /// Insert a new record
    ///
    /// # Errors
    /// [`StoreError::AlreadyExists`](crate::StoreError::AlreadyExists) if a
    /// record with the same ID is present. The table is left untouched.
    fn add(&self, record: Record) -> StoreResult<()>;

    /// Replace an existing record wholesale
    ///
    /// # Errors
    /// [`StoreError::NotFound`](crate::StoreError::NotFound) if no record has
    /// this ID.
    fn update(&self, record: Record) -> StoreResult<()>;

    /// Remove a record
    ///
    /// # Errors
    /// [`StoreError::NotFound`](crate::StoreError::NotFound) if absent.
    fn delete(&self, id: RecordId) -> StoreResult<()>;

    /// Fetch a record by ID
    ///
    /// # Errors
    /// [`StoreError::NotFound`](crate::StoreError::NotFound) if absent.
    fn get(&self, id: RecordId) -> StoreResult<Record>;

    /// Records of `owner` inside the window of `period` starting at `start`
    fn get_by_period(&self, owner: OwnerId, start: NaiveDateTime, period: Period) -> Vec<Record>;

    /// Records of `owner` within one day of `start`
    fn events_for_day(&self, owner: OwnerId, start: NaiveDateTime) -> Vec<Record> {
        self.get_by_period(owner, start, Period::Day)
    }

    /// Records of `owner` within one week of `start`
    fn events_for_week(&self, owner: OwnerId, start: NaiveDateTime) -> Vec<Record> {
        self.get_by_period(owner, start, Period::Week)
    }

    /// Records of `owner` within one calendar month of `start`
    fn events_for_month(&self, owner: OwnerId, start: NaiveDateTime) -> Vec<Record> {
        self.get_by_period(owner, start, Period::Month)
    }

    /// Stop background work and wait for it to finish
    ///
    /// Idempotent: later calls return immediately.
    fn close(&self);
}
