//! The public store handle
//!
//! `Store` ties the in-memory table to its snapshot worker:
//!
//! - `open` loads any existing snapshot and starts the worker
//! - record operations go straight to the table
//! - `close` (or drop) drains the worker and waits for it to exit
//!
//! Only `open` and an explicit `flush` report I/O errors. Everywhere else
//! persistence problems are logged and retried on the next tick.

use crate::config::StoreConfig;
use crate::error::OpenError;
use crate::persister::{FlushOutcome, LifecycleState, Persister, PersisterStats};
use agenda_core::{OwnerId, Period, Record, RecordId, RecordStore, StoreResult};
use agenda_durability::{SnapshotError, SnapshotReader, SnapshotWriter};
use agenda_storage::RecordTable;
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, error, info, warn};

/// In-memory record store with periodic snapshotting
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
///
/// # Example
///
/// ```no_run
/// use agenda_core::{OwnerId, Record, RecordStore};
/// use agenda_engine::{Store, StoreConfig};
///
/// let store = Store::open(StoreConfig::new("/var/lib/agenda/events.snap"))?;
/// let owner = OwnerId::new();
/// let when = chrono::NaiveDate::from_ymd_opt(2024, 1, 10)
///     .unwrap()
///     .and_hms_opt(10, 0, 0)
///     .unwrap();
/// store.add(Record::new(owner, when, "room 2", "planning"))?;
/// assert_eq!(store.events_for_day(owner, when).len(), 1);
/// store.close();
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Store {
    config: StoreConfig,
    table: Arc<RecordTable>,
    persister: Arc<Persister>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Store {
    /// Open a store, loading the snapshot at `config.snapshot_path` if any
    ///
    /// A missing or damaged snapshot is not an error: the store starts empty
    /// and says so in the log.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` for a zero flush interval or empty path
    /// - `Io` if the snapshot's directory cannot be created or the path
    ///   cannot be inspected
    /// - `NotAFile` if the path names something other than a regular file
    /// - `Spawn` if the worker thread cannot be started
    pub fn open(config: StoreConfig) -> Result<Self, OpenError> {
        config.validate()?;
        let path = config.snapshot_path.clone();

        prepare_location(&path)?;

        if let Err(e) = SnapshotWriter::remove_stale_temp(&path) {
            warn!(
                target: "agenda::store",
                path = %path.display(),
                error = %e,
                "Could not remove stale temp file"
            );
        }

        let table = Arc::new(load_table(&path));
        let persister = Arc::new(Persister::new(Arc::clone(&table), path.clone()));
        let handle = persister
            .spawn(config.flush_interval)
            .map_err(OpenError::Spawn)?;

        info!(
            target: "agenda::store",
            path = %path.display(),
            records = table.len(),
            "Store opened"
        );

        Ok(Self {
            config,
            table,
            persister,
            worker: Mutex::new(Some(handle)),
        })
    }

    /// The configuration this store was opened with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the snapshot file
    pub fn snapshot_path(&self) -> &Path {
        self.persister.path()
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.persister.state()
    }

    /// Whether changes exist that no snapshot holds yet
    pub fn is_dirty(&self) -> bool {
        self.table.is_dirty()
    }

    /// Persister counters
    pub fn persister_stats(&self) -> PersisterStats {
        self.persister.stats()
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Whether a record with this ID exists
    pub fn contains(&self, id: RecordId) -> bool {
        self.table.contains(id)
    }

    /// Write a snapshot now if anything changed
    ///
    /// Unlike the background timer, failures are returned to the caller.
    /// Once `close` has begun this does no I/O and returns `Closed`.
    pub fn flush(&self) -> Result<FlushOutcome, SnapshotError> {
        self.persister.flush_requested()
    }

    /// Stop the worker after a final flush, and wait for it to exit
    ///
    /// Idempotent. A concurrent caller blocks until the first close finishes.
    pub fn close(&self) {
        let mut worker = self.worker.lock();
        let handle = match worker.take() {
            Some(handle) => handle,
            None => return,
        };

        self.persister.set_state(LifecycleState::Draining);
        debug!(target: "agenda::store", "Draining snapshot worker");
        self.persister.signal_stop();

        if handle.join().is_err() {
            error!(target: "agenda::store", "Snapshot worker panicked");
        }
        self.persister.set_state(LifecycleState::Stopped);

        info!(
            target: "agenda::store",
            records = self.table.len(),
            dirty = self.table.is_dirty(),
            "Store closed"
        );
    }

    fn note_mutation_after_close(&self, op: &'static str) {
        if self.persister.state() == LifecycleState::Stopped {
            warn!(
                target: "agenda::store",
                op,
                "Store is closed, change will not be persisted"
            );
        }
    }
}

impl RecordStore for Store {
    fn add(&self, record: Record) -> StoreResult<()> {
        self.note_mutation_after_close("add");
        self.table.insert(record)
    }

    fn update(&self, record: Record) -> StoreResult<()> {
        self.note_mutation_after_close("update");
        self.table.replace(record)
    }

    fn delete(&self, id: RecordId) -> StoreResult<()> {
        self.note_mutation_after_close("delete");
        self.table.remove(id).map(|_| ())
    }

    fn get(&self, id: RecordId) -> StoreResult<Record> {
        self.table.get(id)
    }

    fn get_by_period(&self, owner: OwnerId, start: NaiveDateTime, period: Period) -> Vec<Record> {
        self.table.scan_window(owner, start, period)
    }

    fn close(&self) {
        Store::close(self);
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        self.close();
    }
}

/// Make sure the snapshot location is usable before loading
fn prepare_location(path: &Path) -> Result<(), OpenError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| OpenError::io(parent, e))?;
        }
    }

    match std::fs::metadata(path) {
        Ok(meta) if !meta.is_file() => Err(OpenError::NotAFile(path.to_path_buf())),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(OpenError::io(path, e)),
    }
}

/// Load the snapshot into a table, falling back to empty
fn load_table(path: &Path) -> RecordTable {
    match SnapshotReader::load(path) {
        Ok(Some(loaded)) => RecordTable::from_records(loaded.records),
        Ok(None) => {
            debug!(target: "agenda::store", path = %path.display(), "No snapshot, starting empty");
            RecordTable::new()
        }
        Err(e) => {
            warn!(
                target: "agenda::store",
                path = %path.display(),
                error = %e,
                corrupt = e.is_corruption(),
                "Ignoring unreadable snapshot, starting empty"
            );
            RecordTable::new()
        }
    }
}
