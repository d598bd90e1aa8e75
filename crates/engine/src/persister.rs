//! Background snapshot persister
//!
//! One dedicated thread wakes every `flush_interval`, and if the table has
//! changed since the last successful flush, writes a full snapshot. A stop
//! signal wakes it immediately; it performs one final flush-if-dirty and
//! exits.
//!
//! Flushes are serialized by `flush_lock` so that snapshots reach the file in
//! generation order, whether they come from the timer, the final drain, or an
//! explicit [`Store::flush`](crate::Store::flush).

use agenda_durability::{EncodedSnapshot, SnapshotError, SnapshotWriter};
use agenda_storage::RecordTable;
use parking_lot::{Condvar, Mutex};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Lifecycle of a store's background worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Timer active, snapshots written when dirty
    Running,
    /// Stop requested, final flush in progress
    Draining,
    /// Worker exited; nothing more is persisted
    Stopped,
}

/// Result of a flush attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlushOutcome {
    /// A new snapshot replaced the previous one
    Written,
    /// Nothing changed since the last snapshot; no I/O was done
    Clean,
    /// The store is closed; no I/O was done
    Closed,
}

/// Persister counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersisterStats {
    /// Snapshots successfully written
    pub flushes_written: u64,
    /// Flush attempts skipped because the table was clean
    pub flushes_skipped_clean: u64,
    /// Flush attempts that failed to encode or write
    pub flush_failures: u64,
    /// Record count of the most recent successful snapshot
    pub last_flush_records: u64,
}

#[derive(Debug, Default)]
struct Counters {
    written: AtomicU64,
    skipped_clean: AtomicU64,
    failures: AtomicU64,
    last_records: AtomicU64,
}

/// Shared state between the store handle and its worker thread
#[derive(Debug)]
pub(crate) struct Persister {
    table: Arc<RecordTable>,
    path: PathBuf,
    writer: SnapshotWriter,
    flush_lock: Mutex<()>,
    state: Mutex<LifecycleState>,
    stop: Mutex<bool>,
    wake: Condvar,
    counters: Counters,
}

impl Persister {
    pub(crate) fn new(table: Arc<RecordTable>, path: PathBuf) -> Self {
        Self {
            table,
            path,
            writer: SnapshotWriter::new(),
            flush_lock: Mutex::new(()),
            state: Mutex::new(LifecycleState::Running),
            stop: Mutex::new(false),
            wake: Condvar::new(),
            counters: Counters::default(),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn state(&self) -> LifecycleState {
        *self.state.lock()
    }

    pub(crate) fn set_state(&self, state: LifecycleState) {
        *self.state.lock() = state;
    }

    pub(crate) fn stats(&self) -> PersisterStats {
        PersisterStats {
            flushes_written: self.counters.written.load(Ordering::Relaxed),
            flushes_skipped_clean: self.counters.skipped_clean.load(Ordering::Relaxed),
            flush_failures: self.counters.failures.load(Ordering::Relaxed),
            last_flush_records: self.counters.last_records.load(Ordering::Relaxed),
        }
    }

    /// Start the worker thread
    pub(crate) fn spawn(
        self: &Arc<Self>,
        interval: Duration,
    ) -> std::io::Result<JoinHandle<()>> {
        let persister = Arc::clone(self);
        std::thread::Builder::new()
            .name("agenda-snapshot".to_string())
            .spawn(move || persister.run(interval))
    }

    /// Wake the worker and tell it to drain
    pub(crate) fn signal_stop(&self) {
        // Notify under the lock: the worker is either already waiting or
        // will see the flag before it waits.
        let mut stopped = self.stop.lock();
        *stopped = true;
        self.wake.notify_all();
    }

    /// Flush requested by a caller; refuses once shutdown has begun
    pub(crate) fn flush_requested(&self) -> Result<FlushOutcome, SnapshotError> {
        let _guard = self.flush_lock.lock();
        if self.state() != LifecycleState::Running {
            return Ok(FlushOutcome::Closed);
        }
        self.flush_locked()
    }

    /// Flush from the worker (timer tick or final drain)
    fn flush_if_dirty(&self) -> Result<FlushOutcome, SnapshotError> {
        let _guard = self.flush_lock.lock();
        self.flush_locked()
    }

    fn flush_locked(&self) -> Result<FlushOutcome, SnapshotError> {
        if !self.table.is_dirty() {
            self.counters.skipped_clean.fetch_add(1, Ordering::Relaxed);
            debug!(target: "agenda::persister", "Table clean, skipping flush");
            return Ok(FlushOutcome::Clean);
        }

        // Encode under the shared lock, write after releasing it
        let (encoded, generation) = self
            .table
            .with_image(|image| EncodedSnapshot::encode(image.records()));

        let result = encoded.and_then(|snapshot| self.writer.write_atomic(&snapshot, &self.path));
        match result {
            Ok(info) => {
                self.table.mark_persisted(generation);
                self.counters.written.fetch_add(1, Ordering::Relaxed);
                self.counters
                    .last_records
                    .store(info.record_count, Ordering::Relaxed);
                Ok(FlushOutcome::Written)
            }
            Err(e) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// Block until `interval` has elapsed or stop is signalled
    ///
    /// Returns true if stop was signalled.
    ///
    /// An interval too long for `Instant` never times out; the worker then
    /// only wakes for the stop signal.
    fn wait_tick(&self, interval: Duration) -> bool {
        let deadline = Instant::now().checked_add(interval);
        let mut stopped = self.stop.lock();
        while !*stopped {
            match deadline {
                Some(deadline) => {
                    if self.wake.wait_until(&mut stopped, deadline).timed_out() {
                        break;
                    }
                }
                None => self.wake.wait(&mut stopped),
            }
        }
        *stopped
    }

    fn run(&self, interval: Duration) {
        info!(
            target: "agenda::persister",
            path = %self.path.display(),
            interval_ms = interval.as_millis() as u64,
            "Snapshot worker started"
        );

        while !self.wait_tick(interval) {
            if let Err(e) = self.flush_if_dirty() {
                warn!(
                    target: "agenda::persister",
                    path = %self.path.display(),
                    error = %e,
                    "Snapshot flush failed, will retry on next tick"
                );
            }
        }

        match self.flush_if_dirty() {
            Ok(outcome) => debug!(target: "agenda::persister", ?outcome, "Final flush done"),
            Err(e) => warn!(
                target: "agenda::persister",
                path = %self.path.display(),
                error = %e,
                "Final snapshot flush failed, recent changes are not durable"
            ),
        }

        info!(target: "agenda::persister", "Snapshot worker stopped");
    }
}
