//! Log frame format
//!
//! Each mutation is written as one JSON object on its own line:
//!
//! ```text
//! {"kind":0,"id":1,"timestamp":1700000000,"data":{...}}
//! {"kind":1,"id":1,"timestamp":1700000005,"data":{...}}
//! {"kind":2,"id":1,"timestamp":1700000009}
//! ```
//!
//! `kind` is 0 (Insert), 1 (Update) or 2 (Delete). `data` carries the full
//! record for Insert/Update and is omitted for Delete.

use recordstore_core::{Record, RecordId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation kind, encoded on disk as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OpKind {
    /// New record
    Insert,
    /// Full replacement of an existing record
    Update,
    /// Removal of an existing record
    Delete,
}

impl OpKind {
    /// Name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            OpKind::Insert => "insert",
            OpKind::Update => "update",
            OpKind::Delete => "delete",
        }
    }

    /// Whether frames of this kind carry a record payload
    pub fn has_payload(&self) -> bool {
        !matches!(self, OpKind::Delete)
    }
}

impl From<OpKind> for u8 {
    fn from(kind: OpKind) -> u8 {
        match kind {
            OpKind::Insert => 0,
            OpKind::Update => 1,
            OpKind::Delete => 2,
        }
    }
}

impl TryFrom<u8> for OpKind {
    type Error = String;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(OpKind::Insert),
            1 => Ok(OpKind::Update),
            2 => Ok(OpKind::Delete),
            other => Err(format!("unknown operation kind {}", other)),
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One logged mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation<T> {
    /// What the mutation does
    pub kind: OpKind,
    /// Identity of the affected record
    pub id: RecordId,
    /// Wall-clock time of the mutation, seconds since the Unix epoch
    pub timestamp: i64,
    /// Full record for Insert/Update, absent for Delete
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Record> Operation<T> {
    /// Insert of `record`, stamped with the current time
    pub fn insert(record: T) -> Self {
        Self::with_payload(OpKind::Insert, record)
    }

    /// Update of `record`, stamped with the current time
    pub fn update(record: T) -> Self {
        Self::with_payload(OpKind::Update, record)
    }

    /// Delete of `id`, stamped with the current time
    pub fn delete(id: RecordId) -> Self {
        Operation {
            kind: OpKind::Delete,
            id,
            timestamp: now_secs(),
            data: None,
        }
    }

    fn with_payload(kind: OpKind, record: T) -> Self {
        Operation {
            kind,
            id: record.id(),
            timestamp: now_secs(),
            data: Some(record),
        }
    }

    /// Encode as a single JSON line (without the trailing newline)
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode one line and check it is self-consistent.
    ///
    /// A frame is rejected when its payload presence does not match its
    /// kind or when the payload's identity differs from the frame id.
    pub fn decode(line: &str) -> Result<Self, FrameError> {
        let op: Operation<T> =
            serde_json::from_str(line).map_err(|e| FrameError::Malformed(e.to_string()))?;
        op.validate()?;
        Ok(op)
    }

    /// Check payload presence and identity against the frame header
    pub fn validate(&self) -> Result<(), FrameError> {
        match (&self.data, self.kind.has_payload()) {
            (None, true) => Err(FrameError::MissingPayload {
                kind: self.kind,
                id: self.id,
            }),
            (Some(_), false) => Err(FrameError::UnexpectedPayload { id: self.id }),
            (Some(record), true) if record.id() != self.id => Err(FrameError::IdMismatch {
                frame_id: self.id,
                record_id: record.id(),
            }),
            _ => Ok(()),
        }
    }
}

/// Why a log line could not be turned into an [`Operation`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Not valid JSON, or not the expected shape
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// Insert/Update frame without `data`
    #[error("{kind} frame for id {id} has no data")]
    MissingPayload {
        /// Frame kind
        kind: OpKind,
        /// Frame id
        id: RecordId,
    },

    /// Delete frame carrying `data`
    #[error("delete frame for id {id} carries data")]
    UnexpectedPayload {
        /// Frame id
        id: RecordId,
    },

    /// Payload identity differs from the frame id
    #[error("frame id {frame_id} does not match record id {record_id}")]
    IdMismatch {
        /// Id in the frame header
        frame_id: RecordId,
        /// Id reported by the payload
        record_id: RecordId,
    },

    /// Line is not valid UTF-8
    #[error("frame is not valid UTF-8")]
    InvalidUtf8,
}

/// Current time in seconds since the Unix epoch
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}
