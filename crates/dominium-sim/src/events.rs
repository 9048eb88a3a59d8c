//! The UI event ring and optional file sink (spec §6 event line format),
//! ported from `original_source/app/ui_event_log.{h,c}`.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Write};

/// One recorded event line, with the `event_seq` it was stamped with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLine {
    /// Strictly increasing, contiguous sequence number (spec §8 invariant).
    pub seq: u32,
    /// The rendered line, `event_seq=<seq> event=<name> <k=v>...`, without
    /// a trailing newline.
    pub line: String,
}

/// A bounded ring of recent event lines, mirrored to an optional sink file.
///
/// Every successful verb emits into the ring unconditionally; the sink is
/// an additional, independently openable destination for the same
/// sequence, matching `dom_app_ui_event_log_open`'s contract that an empty
/// path disables rather than errors.
pub struct EventRing {
    capacity: usize,
    ring: VecDeque<EventLine>,
    seq: u32,
    sink: Option<File>,
}

impl std::fmt::Debug for EventRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRing")
            .field("capacity", &self.capacity)
            .field("ring_len", &self.ring.len())
            .field("seq", &self.seq)
            .field("sink_open", &self.sink.is_some())
            .finish()
    }
}

impl EventRing {
    /// Creates an empty ring with the given capacity (`0` means unbounded).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ring: VecDeque::new(),
            seq: 0,
            sink: None,
        }
    }

    /// Opens `path` as the file sink. An empty path disables the sink
    /// without error, matching the original's no-handle contract.
    ///
    /// # Errors
    /// Returns the underlying I/O error if `path` cannot be created.
    pub fn open_sink(&mut self, path: &str) -> io::Result<()> {
        if path.is_empty() {
            self.sink = None;
            return Ok(());
        }
        self.sink = Some(File::create(path)?);
        Ok(())
    }

    /// Closes the file sink, if any is open. The ring itself is unaffected.
    pub fn close_sink(&mut self) {
        self.sink = None;
    }

    /// Records one event: assigns the next sequence number, renders the
    /// line, appends it to the ring (evicting the oldest past capacity),
    /// and mirrors it to the sink if one is open. A no-op if `name` is
    /// empty.
    pub fn emit(&mut self, name: &str, fields: &[(&str, String)]) {
        if name.is_empty() {
            return;
        }
        self.seq += 1;
        let mut line = format!("event_seq={} event={name}", self.seq);
        for (key, value) in fields {
            line.push(' ');
            line.push_str(key);
            line.push('=');
            line.push_str(value);
        }

        if self.capacity > 0 && self.ring.len() >= self.capacity {
            self.ring.pop_front();
        }
        self.ring.push_back(EventLine {
            seq: self.seq,
            line: line.clone(),
        });

        if let Some(sink) = self.sink.as_mut() {
            let _ = writeln!(sink, "{line}");
            let _ = sink.flush();
        }
    }

    /// Lines currently held in the ring, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &EventLine> {
        self.ring.iter()
    }

    /// The most recently assigned sequence number (`0` if none emitted).
    #[must_use]
    pub const fn last_seq(&self) -> u32 {
        self.seq
    }
}
