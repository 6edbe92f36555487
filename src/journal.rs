//! Newline-delimited JSON event logs.
//!
//! One encoded event per line, appended in delivery order. A directory of
//! log files is read as a sequence of segments in file-name order.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::codec::{self, Decoded};
use crate::error::EventError;
use crate::model::Event;

/// File extensions picked up when a log path is a directory.
pub const SEGMENT_EXTENSIONS: [&str; 2] = ["jsonl", "ndjson"];

/// Event log writer that appends NDJSON lines.
pub struct EventLogWriter {
    path: PathBuf,
    file: File,
}

impl EventLogWriter {
    /// Open event log file for appending.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, EventError> {
        let path = path.into();
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| EventError::io(&path, e))?;
        Ok(Self { path, file })
    }

    /// Append one event and sync it to disk.
    pub fn append(&mut self, event: &Event) -> Result<(), EventError> {
        let line = codec::encode(event)?;
        writeln!(&mut self.file, "{}", line).map_err(|e| EventError::io(&self.path, e))?;
        self.file
            .sync_all()
            .map_err(|e| EventError::io(&self.path, e))?;
        Ok(())
    }

    /// Append a batch of events with a single sync at the end.
    pub fn append_all<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a Event>,
    ) -> Result<usize, EventError> {
        let mut written = 0;
        for event in events {
            let line = codec::encode(event)?;
            writeln!(&mut self.file, "{}", line).map_err(|e| EventError::io(&self.path, e))?;
            written += 1;
        }
        self.file
            .sync_all()
            .map_err(|e| EventError::io(&self.path, e))?;
        Ok(written)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Streaming reader over one event log file.
///
/// Yields one item per non-blank line. A corrupt line yields an error and
/// the next call moves on to the following line.
pub struct EventLogReader {
    path: PathBuf,
    reader: BufReader<File>,
    buf: Vec<u8>,
    line_no: usize,
}

impl EventLogReader {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, EventError> {
        let path = path.into();
        let file = File::open(&path).map_err(|e| EventError::io(&path, e))?;
        Ok(Self {
            path,
            reader: BufReader::new(file),
            buf: Vec::new(),
            line_no: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of the last line read, starting at 1.
    pub fn line_number(&self) -> usize {
        self.line_no
    }

    fn corrupt_line(&self, reason: String) -> EventError {
        EventError::CorruptLine {
            path: self.path.clone(),
            line: self.line_no,
            reason,
        }
    }
}

impl Iterator for EventLogReader {
    type Item = Result<Decoded, EventError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(EventError::io(&self.path, e))),
            }
            self.line_no += 1;
            let line = match std::str::from_utf8(&self.buf) {
                Ok(line) => line,
                Err(e) => return Some(Err(self.corrupt_line(format!("invalid UTF-8: {e}")))),
            };
            if line.trim().is_empty() {
                continue;
            }
            let decoded = codec::decode(line).map_err(|e| self.corrupt_line(e.to_string()));
            if let Ok(Decoded::Unrecognized { kind, .. }) = &decoded {
                tracing::debug!(path = %self.path.display(), line = self.line_no, %kind, "unrecognized event kind");
            }
            return Some(decoded);
        }
    }
}

/// Read every record from an event log, failing on the first corrupt line.
pub fn read_log(path: impl Into<PathBuf>) -> Result<Vec<Decoded>, EventError> {
    EventLogReader::open(path)?.collect()
}

/// Resolve a log path into the segment files to read, in order.
///
/// A file is its own single segment. A directory contributes its direct
/// children with a known log extension, sorted by file name.
pub fn log_segments(path: &Path) -> Result<Vec<PathBuf>, EventError> {
    let meta = std::fs::metadata(path).map_err(|e| EventError::io(path, e))?;
    if !meta.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut segments = Vec::new();
    for entry in walkdir::WalkDir::new(path).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            EventError::io(path, source)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_segment = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SEGMENT_EXTENSIONS.contains(&ext));
        if is_segment {
            segments.push(entry.into_path());
        }
    }
    segments.sort();
    tracing::debug!(dir = %path.display(), count = segments.len(), "found log segments");
    Ok(segments)
}
