//! Stream summary: counts per kind, close sizes and time bounds.

use bytesize::ByteSize;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::handler::EventHandler;
use crate::model::{
    AppendEvent, CloseEvent, CreateEvent, EventKind, MetadataUpdateEvent, RenameEvent,
    TruncateEvent, UnlinkEvent,
};

/// Aggregate statistics over an event stream.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Summary {
    /// Events seen per kind.
    pub counts: BTreeMap<EventKind, u64>,
    /// Records with a kind this crate does not know, keyed by kind.
    pub unrecognized: BTreeMap<String, u64>,
    /// Lines that failed to decode.
    pub corrupt: u64,
    /// Sum of every known close size. Unknown sizes are excluded.
    pub closed_bytes: u64,
    pub closes_with_unknown_size: u64,
    pub truncated_to_zero: u64,
    pub first_timestamp: Option<i64>,
    pub last_timestamp: Option<i64>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: EventKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_events(&self) -> u64 {
        self.counts.values().sum()
    }

    fn seen(&mut self, kind: EventKind, timestamp: Option<i64>) {
        *self.counts.entry(kind).or_default() += 1;
        if let Some(ts) = timestamp {
            self.first_timestamp = Some(self.first_timestamp.map_or(ts, |first| first.min(ts)));
            self.last_timestamp = Some(self.last_timestamp.map_or(ts, |last| last.max(ts)));
        }
    }

    /// Time covered by the stream's event timestamps.
    pub fn span(&self) -> Option<Duration> {
        let (first, last) = (self.first_timestamp?, self.last_timestamp?);
        let millis = last.checked_sub(first)?;
        u64::try_from(millis).ok().map(Duration::from_millis)
    }

    /// Human-readable multi-line report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} events\n", self.total_events()));
        for kind in EventKind::ALL {
            out.push_str(&format!("  {:<9} {}\n", kind.as_str(), self.count(kind)));
        }
        for (kind, n) in &self.unrecognized {
            out.push_str(&format!("  {:<9} {} (unrecognized)\n", kind, n));
        }
        if self.corrupt > 0 {
            out.push_str(&format!("{} corrupt records\n", self.corrupt));
        }
        out.push_str(&format!(
            "closed bytes: {} ({} closes with unknown size)\n",
            ByteSize::b(self.closed_bytes),
            self.closes_with_unknown_size
        ));
        if let (Some(first), Some(last)) = (self.first_timestamp, self.last_timestamp) {
            out.push_str(&format!("first event: {}\n", format_millis(first)));
            out.push_str(&format!("last event:  {}\n", format_millis(last)));
        }
        if let Some(span) = self.span() {
            out.push_str(&format!("span: {}\n", humantime::format_duration(span)));
        }
        out
    }
}

/// Render a millisecond epoch timestamp as RFC 3339, or the raw number if
/// it is out of range.
pub fn format_millis(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| ms.to_string())
}

impl EventHandler for Summary {
    fn on_create(&mut self, event: &CreateEvent) {
        self.seen(EventKind::Create, Some(event.ctime()));
    }

    fn on_close(&mut self, event: &CloseEvent) {
        self.seen(EventKind::Close, Some(event.timestamp()));
        match event.known_file_size() {
            Some(size) => {
                let size = u64::try_from(size).unwrap_or(0);
                self.closed_bytes = self.closed_bytes.saturating_add(size);
            }
            None => self.closes_with_unknown_size += 1,
        }
    }

    fn on_append(&mut self, _event: &AppendEvent) {
        self.seen(EventKind::Append, None);
    }

    fn on_rename(&mut self, event: &RenameEvent) {
        self.seen(EventKind::Rename, Some(event.timestamp()));
    }

    fn on_metadata_update(&mut self, _event: &MetadataUpdateEvent) {
        self.seen(EventKind::Metadata, None);
    }

    fn on_unlink(&mut self, event: &UnlinkEvent) {
        self.seen(EventKind::Unlink, Some(event.timestamp()));
    }

    fn on_truncate(&mut self, event: &TruncateEvent) {
        self.seen(EventKind::Truncate, Some(event.timestamp()));
        if event.file_size() == 0 {
            self.truncated_to_zero += 1;
        }
    }

    fn on_unrecognized(&mut self, kind: &str, _record: &Value) {
        *self.unrecognized.entry(kind.to_string()).or_default() += 1;
    }
}
