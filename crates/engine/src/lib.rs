//! Store engine for Agenda
//!
//! This crate ties the lower layers together:
//! - Store: the public handle implementing `RecordStore`
//! - Snapshot persister: background flush worker and shutdown drain
//! - StoreConfig: snapshot location and flush interval (code or TOML)
//! - Logging bootstrap for binaries and tests
//!
//! The engine is the only component that knows about both the table and
//! the snapshot file.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod logging;
pub mod persister;
pub mod store;

pub use config::{StoreConfig, DEFAULT_FLUSH_INTERVAL, DEFAULT_SNAPSHOT_FILE, MIN_FLUSH_INTERVAL};
pub use error::OpenError;
pub use persister::{FlushOutcome, LifecycleState, PersisterStats};
pub use store::Store;
