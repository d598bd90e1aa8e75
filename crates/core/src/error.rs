//! Business-level error types for the record store
//!
//! Exactly two conditions are surfaced to callers of store operations:
//! a record is missing, or a record with the same ID already exists.
//! Storage and snapshot failures never show up here; they are handled
//! inside the engine.

use crate::types::RecordId;
use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Error returned by record store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record with this ID exists
    #[error("record not found: {0}")]
    NotFound(RecordId),

    /// A record with this ID already exists
    #[error("record already exists: {0}")]
    AlreadyExists(RecordId),
}

/// Comparable error category, independent of the offending ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`StoreError::NotFound`]
    NotFound,
    /// See [`StoreError::AlreadyExists`]
    AlreadyExists,
}

impl StoreError {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::AlreadyExists(_) => ErrorKind::AlreadyExists,
        }
    }

    /// The record ID the failed operation referred to
    pub fn record_id(&self) -> RecordId {
        match self {
            StoreError::NotFound(id) | StoreError::AlreadyExists(id) => *id,
        }
    }

    /// Returns true for [`StoreError::NotFound`]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Returns true for [`StoreError::AlreadyExists`]
    pub fn is_already_exists(&self) -> bool {
        self.kind() == ErrorKind::AlreadyExists
    }
}
