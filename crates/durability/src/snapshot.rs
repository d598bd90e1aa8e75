//! Snapshot writer and reader
//!
//! Provides:
//! - Encoding of a record image into the snapshot format
//! - Atomic write (temp file + fsync + rename)
//! - CRC32 validation and decoding on load
//!
//! A snapshot always holds the complete table. There is no incremental log;
//! anything written after the last successful flush is lost on a crash.

use crate::snapshot_types::*;
use agenda_core::{Record, RecordId};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ============================================================================
// Encoding
// ============================================================================

/// A fully encoded snapshot, ready to be written
///
/// Encoding happens while the caller holds its table lock; writing happens
/// after the lock is released.
#[derive(Debug, Clone)]
pub struct EncodedSnapshot {
    header: SnapshotHeader,
    bytes: Vec<u8>,
}

impl EncodedSnapshot {
    /// Encode records into a complete snapshot (header, payload, CRC32)
    pub fn encode<'a, I>(records: I) -> Result<Self, SnapshotError>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let records: Vec<&Record> = records.into_iter().collect();
        let payload =
            rmp_serde::to_vec(&records).map_err(|e| SnapshotError::Serialize(e.to_string()))?;

        let header = SnapshotHeader::new(records.len() as u64, payload.len() as u64);
        let mut bytes = Vec::with_capacity(MIN_SNAPSHOT_SIZE + payload.len());
        bytes.extend_from_slice(&header.to_bytes());
        bytes.extend_from_slice(&payload);

        let checksum = crc32fast::hash(&bytes);
        bytes.extend_from_slice(&checksum.to_le_bytes());

        Ok(EncodedSnapshot { header, bytes })
    }

    /// Header of this snapshot
    pub fn header(&self) -> &SnapshotHeader {
        &self.header
    }

    /// Number of records encoded
    pub fn record_count(&self) -> u64 {
        self.header.record_count
    }

    /// Raw file contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Path of the temporary file used while replacing `path`
///
/// The temp file sits next to the target so the final rename never crosses
/// a filesystem boundary.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// ============================================================================
// Snapshot Writer
// ============================================================================

/// Writes snapshots atomically using the temp file + rename pattern
#[derive(Debug, Default, Clone, Copy)]
pub struct SnapshotWriter;

impl SnapshotWriter {
    /// Create a new snapshot writer
    pub fn new() -> Self {
        SnapshotWriter
    }

    /// Write snapshot atomically
    ///
    /// 1. Write to `<path>.tmp`
    /// 2. Sync temp file
    /// 3. Rename temp to final (atomic on POSIX)
    /// 4. Sync the parent directory where the platform allows it
    ///
    /// If any step fails the temp file is cleaned up and the previous
    /// snapshot at `path` is left intact.
    pub fn write_atomic(
        &self,
        snapshot: &EncodedSnapshot,
        path: &Path,
    ) -> Result<SnapshotInfo, SnapshotError> {
        let temp_path = temp_path(path);

        debug!(
            target: "agenda::snapshot",
            final_path = %path.display(),
            temp_path = %temp_path.display(),
            "Starting atomic snapshot write"
        );

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Left behind by a previous failed attempt
        if temp_path.exists() {
            warn!(target: "agenda::snapshot", path = %temp_path.display(), "Removing stale temp file");
            let _ = std::fs::remove_file(&temp_path);
        }

        if let Err(e) = Self::write_file(snapshot.as_bytes(), &temp_path) {
            warn!(
                target: "agenda::snapshot",
                temp_path = %temp_path.display(),
                error = %e,
                "Write failed, cleaning up temp file"
            );
            let _ = std::fs::remove_file(&temp_path);
            return Err(SnapshotError::Io(e));
        }

        if let Err(e) = std::fs::rename(&temp_path, path) {
            warn!(
                target: "agenda::snapshot",
                temp_path = %temp_path.display(),
                error = %e,
                "Rename failed, cleaning up temp file"
            );
            let _ = std::fs::remove_file(&temp_path);
            return Err(SnapshotError::Io(e));
        }

        sync_parent_dir(path);

        let size_bytes = snapshot.as_bytes().len() as u64;
        info!(
            target: "agenda::snapshot",
            path = %path.display(),
            records = snapshot.record_count(),
            size_bytes,
            "Snapshot written"
        );

        Ok(SnapshotInfo {
            path: path.to_path_buf(),
            timestamp_micros: snapshot.header().timestamp_micros,
            record_count: snapshot.record_count(),
            size_bytes,
        })
    }

    /// Remove a leftover `<path>.tmp`, returning whether one existed
    pub fn remove_stale_temp(path: &Path) -> std::io::Result<bool> {
        let temp_path = temp_path(path);
        match std::fs::remove_file(&temp_path) {
            Ok(()) => {
                warn!(target: "agenda::snapshot", path = %temp_path.display(), "Removed stale temp file");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn write_file(bytes: &[u8], path: &Path) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
        debug!(target: "agenda::snapshot", error = %e, "Directory sync skipped");
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) {}

// ============================================================================
// Snapshot Reader
// ============================================================================

/// Decoded snapshot contents
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    /// Parsed header
    pub header: SnapshotHeader,
    /// Records in payload order
    pub records: Vec<Record>,
}

/// Snapshot reader for loading and validating snapshots
pub struct SnapshotReader;

impl SnapshotReader {
    /// Load the snapshot at `path`
    ///
    /// Returns `Ok(None)` when no file exists. Any other read failure is
    /// an `Io` error; damaged content is reported through the other
    /// variants (see [`SnapshotError::is_corruption`]).
    pub fn load(path: &Path) -> Result<Option<LoadedSnapshot>, SnapshotError> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(target: "agenda::snapshot", path = %path.display(), "No snapshot file");
                return Ok(None);
            }
            Err(e) => return Err(SnapshotError::Io(e)),
        };

        let loaded = Self::decode(&data)?;
        debug!(
            target: "agenda::snapshot",
            path = %path.display(),
            records = loaded.records.len(),
            taken_at_micros = loaded.header.timestamp_micros,
            "Snapshot decoded"
        );
        Ok(Some(loaded))
    }

    /// Validate and decode snapshot bytes
    pub fn decode(data: &[u8]) -> Result<LoadedSnapshot, SnapshotError> {
        if data.len() < MIN_SNAPSHOT_SIZE {
            return Err(SnapshotError::TooShort {
                expected: MIN_SNAPSHOT_SIZE,
                actual: data.len(),
            });
        }

        let header = SnapshotHeader::from_bytes(data)?;
        Self::validate_checksum(data)?;

        let payload = &data[SNAPSHOT_HEADER_SIZE..data.len() - SNAPSHOT_TRAILER_SIZE];
        if payload.len() as u64 != header.payload_len {
            return Err(SnapshotError::LengthMismatch {
                field: "payload_len",
                expected: header.payload_len,
                actual: payload.len() as u64,
            });
        }

        let records: Vec<Record> =
            rmp_serde::from_slice(payload).map_err(|e| SnapshotError::Deserialize(e.to_string()))?;
        if records.len() as u64 != header.record_count {
            return Err(SnapshotError::LengthMismatch {
                field: "record_count",
                expected: header.record_count,
                actual: records.len() as u64,
            });
        }

        let mut seen: HashSet<RecordId> = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(SnapshotError::DuplicateId(record.id.to_string()));
            }
        }

        Ok(LoadedSnapshot { header, records })
    }

    /// Check the CRC32 trailer against the rest of the data
    pub fn validate_checksum(data: &[u8]) -> Result<(), SnapshotError> {
        if data.len() < MIN_SNAPSHOT_SIZE {
            return Err(SnapshotError::TooShort {
                expected: MIN_SNAPSHOT_SIZE,
                actual: data.len(),
            });
        }

        let (content, checksum_bytes) = data.split_at(data.len() - SNAPSHOT_TRAILER_SIZE);
        let stored = u32::from_le_bytes(le_array(checksum_bytes));
        let computed = crc32fast::hash(content);

        if stored != computed {
            return Err(SnapshotError::ChecksumMismatch {
                expected: stored,
                actual: computed,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
