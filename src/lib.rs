//! Agenda - in-memory record store for a scheduling service
//!
//! Agenda keeps time-stamped records (who, when, where, what) in memory,
//! answers day / week / month range queries per owner, and snapshots the
//! whole table to a single file from a background thread.
//!
//! # Quick Start
//!
//! ```no_run
//! use agenda::{OwnerId, Record, RecordStore, Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::new("data/events.snap"))?;
//!
//! let owner = OwnerId::new();
//! let when = chrono::NaiveDate::from_ymd_opt(2024, 1, 10)
//!     .unwrap()
//!     .and_hms_opt(10, 0, 0)
//!     .unwrap();
//! store.add(Record::new(owner, when, "Room 101", "Design review"))?;
//!
//! let week = store.events_for_week(owner, when);
//! assert_eq!(week.len(), 1);
//!
//! // Final flush, then the worker exits
//! store.close();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - `agenda-core`: records, identifiers, periods, errors, the `RecordStore` trait
//! - `agenda-storage`: the lock-guarded table with dirty tracking
//! - `agenda-durability`: snapshot file format and atomic writes
//! - `agenda-engine`: the `Store` handle, its persister and configuration
//!
//! Only the items re-exported here are the supported surface.

pub use agenda_core::{
    ErrorKind, OwnerId, Period, Record, RecordId, RecordStore, StoreError, StoreResult,
};
pub use agenda_durability::SnapshotError;
pub use agenda_engine::{
    logging, FlushOutcome, LifecycleState, OpenError, PersisterStats, Store, StoreConfig,
    DEFAULT_FLUSH_INTERVAL, DEFAULT_SNAPSHOT_FILE, MIN_FLUSH_INTERVAL,
};
