//! Core types and traits for Agenda
//!
//! This crate defines the foundational types used throughout the system:
//! - RecordId / OwnerId: identifiers for records and their owners
//! - Record: the time-stamped entry kept by the store
//! - Period: day / week / month query windows with inclusive ends
//! - StoreError: the two business-level error kinds
//! - RecordStore: the contract exposed to callers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod period;
pub mod record;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, StoreError, StoreResult};
pub use period::Period;
pub use record::Record;
pub use traits::RecordStore;
pub use types::{OwnerId, RecordId};
