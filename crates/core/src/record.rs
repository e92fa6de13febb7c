//! The record contract
//!
//! The engine is generic over any type that exposes a stable integer
//! identity and a lossless serde representation. It never looks at
//! record fields beyond [`Record::id`].

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Integer identity of a record, unique among live records.
pub type RecordId = i64;

/// A persistable record.
///
/// The serialized form is used verbatim both in snapshot files and in
/// the `data` field of log frames, so `Serialize` followed by
/// `Deserialize` must reproduce an equal value.
///
/// # Example
///
/// ```
/// use recordstore_core::{Record, RecordId};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Group {
///     id: RecordId,
///     name: String,
/// }
///
/// impl Record for Group {
///     fn id(&self) -> RecordId {
///         self.id
///     }
/// }
/// ```
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Stable identity of this record
    fn id(&self) -> RecordId;
}
