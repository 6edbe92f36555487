//! JSON record codec for events.
//!
//! A record is one JSON object tagged by `"kind"`. Decoding keeps two
//! failure modes apart: bytes that do not form a complete event are a
//! [`EventError::CorruptRecord`], while a well-formed record whose kind is
//! newer than this crate comes back as [`Decoded::Unrecognized`] so a
//! stream reader can skip it and keep going.

use serde_json::Value;

use crate::error::EventError;
use crate::model::{Event, EventKind};

/// Name of the discriminator field in an encoded record.
pub const KIND_FIELD: &str = "kind";

/// Outcome of decoding one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Event(Event),
    /// A record whose kind this crate does not know.
    Unrecognized { kind: String, record: Value },
}

impl Decoded {
    pub fn event(&self) -> Option<&Event> {
        match self {
            Decoded::Event(event) => Some(event),
            Decoded::Unrecognized { .. } => None,
        }
    }

    pub fn into_event(self) -> Option<Event> {
        match self {
            Decoded::Event(event) => Some(event),
            Decoded::Unrecognized { .. } => None,
        }
    }
}

/// Encode an event as a single-line JSON record.
pub fn encode(event: &Event) -> Result<String, EventError> {
    serde_json::to_string(event).map_err(|e| EventError::Serialization(e.to_string()))
}

/// Decode one JSON record.
pub fn decode(record: &str) -> Result<Decoded, EventError> {
    let value: Value =
        serde_json::from_str(record).map_err(|e| EventError::CorruptRecord(e.to_string()))?;
    decode_value(value)
}

/// Decode a record that has already been parsed as JSON.
pub fn decode_value(value: Value) -> Result<Decoded, EventError> {
    let kind = match value.get(KIND_FIELD) {
        Some(Value::String(kind)) => kind.clone(),
        Some(other) => {
            return Err(EventError::CorruptRecord(format!(
                "`{KIND_FIELD}` must be a string, got {other}"
            )));
        }
        None if value.is_object() => {
            return Err(EventError::CorruptRecord(format!(
                "missing `{KIND_FIELD}` field"
            )));
        }
        None => {
            return Err(EventError::CorruptRecord(
                "record is not a JSON object".to_string(),
            ));
        }
    };

    if kind.parse::<EventKind>().is_err() {
        return Ok(Decoded::Unrecognized {
            kind,
            record: value,
        });
    }

    let event: Event = serde_json::from_value(value)
        .map_err(|e| EventError::CorruptRecord(format!("{kind} record: {e}")))?;
    Ok(Decoded::Event(event))
}
