//! RecordTable: the keyed record map and its locking discipline
//!
//! This module implements the in-memory table using:
//! - `HashMap<RecordId, Record>` keyed by record ID, no implicit ordering
//! - `parking_lot::RwLock` granting many readers or one writer
//! - a generation counter for dirty tracking
//!
//! # Dirty tracking
//!
//! Every successful mutation bumps `generation` while holding the write lock.
//! A flush captures the generation together with the image it serializes
//! (under the read lock) and, once the bytes are durable, reports it back via
//! [`RecordTable::mark_persisted`]. The table is dirty whenever the current
//! generation is ahead of the persisted one, so a mutation that lands while a
//! flush is writing keeps the table dirty for the next flush.
//!
//! # Range scans
//!
//! There is no secondary index. Window queries walk the whole map under the
//! read lock, so their cost and lock hold time are linear in table size.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use agenda_core::{OwnerId, Period, Record, RecordId, StoreError, StoreResult};
use chrono::NaiveDateTime;
use parking_lot::RwLock;
use tracing::trace;

#[derive(Debug, Default)]
struct TableState {
    records: HashMap<RecordId, Record>,
    generation: u64,
}

impl TableState {
    fn bump(&mut self) {
        self.generation += 1;
    }
}

/// Thread-safe record table with dirty tracking
///
/// Mutations (`insert`, `replace`, `remove`) take the exclusive lock; reads,
/// range scans and snapshot images take the shared lock.
#[derive(Debug, Default)]
pub struct RecordTable {
    state: RwLock<TableState>,
    /// Highest generation known to be on durable storage
    persisted: AtomicU64,
}

impl RecordTable {
    /// Create an empty, clean table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clean table holding `records`
    ///
    /// Used when restoring from a snapshot: the contents are already durable,
    /// so the table starts clean. Later duplicates of an ID replace earlier
    /// ones.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id, record))
            .collect();
        Self {
            state: RwLock::new(TableState {
                records,
                generation: 0,
            }),
            persisted: AtomicU64::new(0),
        }
    }

    /// Insert a record that must not exist yet
    pub fn insert(&self, record: Record) -> StoreResult<()> {
        let mut state = self.state.write();
        if state.records.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists(record.id));
        }
        trace!(target: "agenda::store", id = %record.id, "record inserted");
        state.records.insert(record.id, record);
        state.bump();
        Ok(())
    }

    /// Replace an existing record with the same ID
    pub fn replace(&self, record: Record) -> StoreResult<()> {
        let mut state = self.state.write();
        match state.records.get_mut(&record.id) {
            Some(slot) => {
                trace!(target: "agenda::store", id = %record.id, "record replaced");
                *slot = record;
            }
            None => return Err(StoreError::NotFound(record.id)),
        }
        state.bump();
        Ok(())
    }

    /// Remove a record, returning it
    pub fn remove(&self, id: RecordId) -> StoreResult<Record> {
        let mut state = self.state.write();
        let removed = state.records.remove(&id).ok_or(StoreError::NotFound(id))?;
        trace!(target: "agenda::store", id = %id, "record removed");
        state.bump();
        Ok(removed)
    }

    /// Clone of the record with this ID
    pub fn get(&self, id: RecordId) -> StoreResult<Record> {
        self.state
            .read()
            .records
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Whether a record with this ID exists
    pub fn contains(&self, id: RecordId) -> bool {
        self.state.read().records.contains_key(&id)
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    /// Returns true if the table holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records of `owner` inside the `period` window starting at `start`
    ///
    /// Sorted by `(when, id)`. Empty when nothing matches.
    pub fn scan_window(&self, owner: OwnerId, start: NaiveDateTime, period: Period) -> Vec<Record> {
        let state = self.state.read();
        let mut matches: Vec<Record> = state
            .records
            .values()
            .filter(|record| record.is_owned_by(owner) && period.contains(start, record.when))
            .cloned()
            .collect();
        drop(state);
        matches.sort_by(|a, b| a.when.cmp(&b.when).then(a.id.cmp(&b.id)));
        matches
    }

    /// Current mutation generation
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// Whether mutations happened since the last persisted generation
    pub fn is_dirty(&self) -> bool {
        let generation = self.generation();
        generation > self.persisted.load(Ordering::Acquire)
    }

    /// Run `f` over a consistent image of the table
    ///
    /// The shared lock is held for the duration of `f`, so no mutation can
    /// interleave. Returns `f`'s result together with the generation the image
    /// corresponds to; pass that generation to [`mark_persisted`] once the
    /// image is durable.
    ///
    /// [`mark_persisted`]: RecordTable::mark_persisted
    pub fn with_image<T>(&self, f: impl FnOnce(TableImage<'_>) -> T) -> (T, u64) {
        let state = self.state.read();
        let generation = state.generation;
        let out = f(TableImage {
            records: &state.records,
        });
        (out, generation)
    }

    /// Record that everything up to `generation` is durable
    ///
    /// Never moves the persisted mark backwards.
    pub fn mark_persisted(&self, generation: u64) {
        self.persisted.fetch_max(generation, Ordering::AcqRel);
    }
}

/// Borrowed, read-locked view of every record in the table
#[derive(Debug, Clone, Copy)]
pub struct TableImage<'a> {
    records: &'a HashMap<RecordId, Record>,
}

impl<'a> TableImage<'a> {
    /// Number of records in the image
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the image holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the records in no particular order
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + 'a {
        self.records.values()
    }
}
