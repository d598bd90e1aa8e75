//! Durability layer for Agenda
//!
//! This crate handles everything that touches disk:
//!
//! - Snapshot format: magic, version, header, MessagePack payload, CRC32
//! - Atomic snapshot writes (temp file + fsync + rename)
//! - Validated snapshot loading with corruption classification

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod snapshot; // Snapshot writer and reader
pub mod snapshot_types; // Snapshot header, constants and errors

pub use snapshot::{temp_path, EncodedSnapshot, LoadedSnapshot, SnapshotReader, SnapshotWriter};
pub use snapshot_types::{
    now_micros, SnapshotError, SnapshotHeader, SnapshotInfo, MIN_SNAPSHOT_SIZE,
    SNAPSHOT_HEADER_SIZE, SNAPSHOT_MAGIC, SNAPSHOT_TRAILER_SIZE, SNAPSHOT_VERSION_1,
};
