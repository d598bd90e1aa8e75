//! The record stored by the scheduling service

use crate::types::{OwnerId, RecordId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A time-stamped entry owned by one owner
///
/// Records are replaced wholesale on update; there is no partial mutation
/// path through the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Key of the record in the store
    pub id: RecordId,
    /// Owner the record belongs to
    pub owner_id: OwnerId,
    /// Local (naive) timestamp of the record
    pub when: NaiveDateTime,
    /// Where it takes place
    pub place: String,
    /// What it is about
    pub description: String,
}

impl Record {
    /// Create a record with a freshly generated ID
    pub fn new(
        owner_id: OwnerId,
        when: NaiveDateTime,
        place: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::with_id(RecordId::new(), owner_id, when, place, description)
    }

    /// Create a record with a caller-provided ID
    pub fn with_id(
        id: RecordId,
        owner_id: OwnerId,
        when: NaiveDateTime,
        place: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            owner_id,
            when,
            place: place.into(),
            description: description.into(),
        }
    }

    /// Returns true if the record belongs to `owner`
    pub fn is_owned_by(&self, owner: OwnerId) -> bool {
        self.owner_id == owner
    }
}
