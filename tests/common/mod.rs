//! Shared test utilities for the integration suites.
//!
//! Import via `mod common;` from any test's main.rs.

#![allow(dead_code)]

use agenda::{OwnerId, Record, Store, StoreConfig};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

// ============================================================================
// Time helpers
// ============================================================================

/// Parse `YYYY-MM-DDTHH:MM:SS`
pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
}

/// Midnight of a calendar date
pub fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn record_at(owner: OwnerId, when: NaiveDateTime, what: &str) -> Record {
    Record::new(owner, when, "somewhere", what)
}

// ============================================================================
// TestStore - Store in a temporary directory
// ============================================================================

/// Store backed by a temp directory that lives as long as the wrapper
pub struct TestStore {
    pub store: Store,
    pub dir: TempDir,
}

impl TestStore {
    /// Store whose timer effectively never fires
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(3600))
    }

    pub fn with_interval(interval: Duration) -> Self {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::new(dir.path().join("events.snap")).with_flush_interval(interval);
        let store = Store::open(config).unwrap();
        Self { store, dir }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.path().join("events.snap")
    }

    /// Close the store and open a fresh one on the same snapshot
    pub fn reopen(self) -> Self {
        let TestStore { store, dir } = self;
        store.close();
        drop(store);
        let config = StoreConfig::new(dir.path().join("events.snap"))
            .with_flush_interval(Duration::from_secs(3600));
        let store = Store::open(config).unwrap();
        Self { store, dir }
    }
}

impl std::ops::Deref for TestStore {
    type Target = Store;

    fn deref(&self) -> &Store {
        &self.store
    }
}
