//! Snapshot format types
//!
//! This module defines the on-disk layout of a record snapshot: a full image
//! of the live table, replaced as a whole on every flush.
//!
//! ## Snapshot File Layout
//!
//! ```text
//! +--------------------+
//! | Magic (10 bytes)   |  "AGENDA_SNP"
//! +--------------------+
//! | Version (4)        |  Format version (1)
//! +--------------------+
//! | Timestamp (8)      |  Microseconds since epoch
//! +--------------------+
//! | Record Count (8)   |  Records in the payload
//! +--------------------+
//! | Payload Length (8) |  Bytes of payload that follow
//! +--------------------+
//! | Payload            |  MessagePack sequence of records
//! +--------------------+
//! | CRC32 (4)          |  Checksum of everything above
//! +--------------------+
//! ```
//!
//! All integers are little-endian. Readers reject any version other than the
//! one they were built for; there is no migration path between versions.

use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Snapshot file magic bytes
pub const SNAPSHOT_MAGIC: &[u8; 10] = b"AGENDA_SNP";

/// Snapshot format version 1
pub const SNAPSHOT_VERSION_1: u32 = 1;

/// Header size: Magic(10) + Version(4) + Timestamp(8) + Count(8) + PayloadLen(8)
pub const SNAPSHOT_HEADER_SIZE: usize = 38;

/// Trailer size: CRC32(4)
pub const SNAPSHOT_TRAILER_SIZE: usize = 4;

/// Minimum snapshot size: Header + CRC32
pub const MIN_SNAPSHOT_SIZE: usize = SNAPSHOT_HEADER_SIZE + SNAPSHOT_TRAILER_SIZE;

// ============================================================================
// Snapshot Header
// ============================================================================

/// Fixed-size header at the start of every snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotHeader {
    /// Format version
    pub version: u32,
    /// When the snapshot was taken (microseconds since epoch)
    pub timestamp_micros: u64,
    /// Number of records in the payload
    pub record_count: u64,
    /// Length of the payload in bytes
    pub payload_len: u64,
}

impl SnapshotHeader {
    /// Create a header stamped with the current time
    pub fn new(record_count: u64, payload_len: u64) -> Self {
        Self::with_timestamp(record_count, payload_len, now_micros())
    }

    /// Create a header with an explicit timestamp
    pub fn with_timestamp(record_count: u64, payload_len: u64, timestamp_micros: u64) -> Self {
        SnapshotHeader {
            version: SNAPSHOT_VERSION_1,
            timestamp_micros,
            record_count,
            payload_len,
        }
    }

    /// Serialize header to bytes (including magic)
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(SNAPSHOT_HEADER_SIZE);
        buf.extend_from_slice(SNAPSHOT_MAGIC);
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(&self.timestamp_micros.to_le_bytes());
        buf.extend_from_slice(&self.record_count.to_le_bytes());
        buf.extend_from_slice(&self.payload_len.to_le_bytes());
        buf
    }

    /// Parse header from bytes (including magic)
    pub fn from_bytes(data: &[u8]) -> Result<Self, SnapshotError> {
        if data.len() < SNAPSHOT_HEADER_SIZE {
            return Err(SnapshotError::TooShort {
                expected: SNAPSHOT_HEADER_SIZE,
                actual: data.len(),
            });
        }

        if &data[0..10] != SNAPSHOT_MAGIC {
            return Err(SnapshotError::InvalidMagic {
                found: data[0..10].to_vec(),
            });
        }

        let version = u32::from_le_bytes(le_array(&data[10..14]));
        if version != SNAPSHOT_VERSION_1 {
            return Err(SnapshotError::UnsupportedVersion(version));
        }

        Ok(SnapshotHeader {
            version,
            timestamp_micros: u64::from_le_bytes(le_array(&data[14..22])),
            record_count: u64::from_le_bytes(le_array(&data[22..30])),
            payload_len: u64::from_le_bytes(le_array(&data[30..38])),
        })
    }
}

/// Copy a fixed-width slice into an array
///
/// Callers slice exactly `N` bytes after checking the buffer length.
pub(crate) fn le_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

// ============================================================================
// Snapshot Info
// ============================================================================

/// Snapshot info returned after a successful write
#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    /// Path to the snapshot file
    pub path: std::path::PathBuf,
    /// Timestamp when the snapshot was taken
    pub timestamp_micros: u64,
    /// Records written
    pub record_count: u64,
    /// Total size in bytes
    pub size_bytes: u64,
}

// ============================================================================
// Error Types
// ============================================================================

/// Snapshot errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot data too short
    #[error("Snapshot too short: expected at least {expected} bytes, got {actual}")]
    TooShort {
        /// Expected minimum size
        expected: usize,
        /// Actual size
        actual: usize,
    },

    /// Invalid magic bytes
    #[error("Invalid magic bytes: expected AGENDA_SNP, found {:?}", found)]
    InvalidMagic {
        /// Found bytes
        found: Vec<u8>,
    },

    /// Unsupported version
    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),

    /// Checksum mismatch
    #[error("Checksum mismatch: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        /// Checksum stored in the file
        expected: u32,
        /// Checksum computed over the content
        actual: u32,
    },

    /// Payload length or record count disagrees with the header
    #[error("Length mismatch in {field}: header says {expected}, found {actual}")]
    LengthMismatch {
        /// Which header field disagreed
        field: &'static str,
        /// Value from the header
        expected: u64,
        /// Value found in the data
        actual: u64,
    },

    /// The same record ID appears twice in one snapshot
    #[error("Duplicate record ID in snapshot: {0}")]
    DuplicateId(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

impl SnapshotError {
    /// True when the file's content is damaged or foreign, as opposed to an
    /// I/O or encoding failure on our side
    pub fn is_corruption(&self) -> bool {
        !matches!(self, SnapshotError::Io(_) | SnapshotError::Serialize(_))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Get current time in microseconds since epoch
///
/// Returns 0 if system clock is before Unix epoch (clock went backwards).
pub fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

// ============================================================================
// Tests
// ============================================================================
