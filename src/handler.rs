//! Exhaustive dispatch of events to a consumer.
//!
//! Every kind has a required method, so adding a kind breaks every
//! implementor at compile time instead of silently dropping events.

use serde_json::Value;

use crate::codec::Decoded;
use crate::model::{
    AppendEvent, CloseEvent, CreateEvent, Event, MetadataUpdateEvent, RenameEvent, TruncateEvent,
    UnlinkEvent,
};

/// A consumer of an event stream.
pub trait EventHandler {
    fn on_create(&mut self, event: &CreateEvent);
    fn on_close(&mut self, event: &CloseEvent);
    fn on_append(&mut self, event: &AppendEvent);
    fn on_rename(&mut self, event: &RenameEvent);
    fn on_metadata_update(&mut self, event: &MetadataUpdateEvent);
    fn on_unlink(&mut self, event: &UnlinkEvent);
    fn on_truncate(&mut self, event: &TruncateEvent);

    /// Called for records written by a newer producer. Ignored by default.
    fn on_unrecognized(&mut self, kind: &str, _record: &Value) {
        tracing::trace!(%kind, "ignoring unrecognized event");
    }
}

/// Route one event to the handler method for its kind.
pub fn dispatch_event<H: EventHandler + ?Sized>(event: &Event, handler: &mut H) {
    match event {
        Event::Create(e) => handler.on_create(e),
        Event::Close(e) => handler.on_close(e),
        Event::Append(e) => handler.on_append(e),
        Event::Rename(e) => handler.on_rename(e),
        Event::MetadataUpdate(e) => handler.on_metadata_update(e),
        Event::Unlink(e) => handler.on_unlink(e),
        Event::Truncate(e) => handler.on_truncate(e),
    }
}

/// Route a decoded record, including unrecognized ones.
pub fn dispatch<H: EventHandler + ?Sized>(decoded: &Decoded, handler: &mut H) {
    match decoded {
        Decoded::Event(event) => dispatch_event(event, handler),
        Decoded::Unrecognized { kind, record } => handler.on_unrecognized(kind, record),
    }
}
