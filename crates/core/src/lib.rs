//! Core types and traits for recordstore
//!
//! This crate defines the foundational types used throughout the system:
//! - RecordId: Integer identity of a stored record
//! - Record: Contract a caller's entity type implements to be persisted
//! - StoreError: Error type hierarchy shared by every layer

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod record;

pub use error::{StoreError, StoreResult};
pub use record::{Record, RecordId};
