//! Storage layer for Agenda
//!
//! This crate implements the in-memory record table:
//! - RecordTable: HashMap-based storage behind one `parking_lot::RwLock`
//! - Generation-based dirty tracking for the snapshot persister
//! - Linear owner/window scans for range queries
//!
//! Durability lives elsewhere; this crate never touches the filesystem.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod table;

pub use table::{RecordTable, TableImage};
