//! Error types for encoding, decoding and reading event logs.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the serialization boundary.
///
/// Building or inspecting an event never fails; only bytes coming back in
/// from storage or the wire can.
#[derive(Debug, Error)]
pub enum EventError {
    /// A record could not be decoded into a complete event.
    #[error("corrupt event record: {0}")]
    CorruptRecord(String),

    /// A line of an event log could not be decoded.
    #[error("corrupt event record at {}:{line}: {reason}", .path.display())]
    CorruptLine {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Reading or writing an event log failed.
    #[error("event log I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An event could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl EventError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EventError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the decode failures that mean the stored bytes are bad.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, EventError::CorruptRecord(_) | EventError::CorruptLine { .. })
    }
}
