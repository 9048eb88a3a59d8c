//! Verb-line replay log, ported from `client_shell.c`'s
//! `dom_shell_inspect_replay` (`DOM_SHELL_REPLAY_HEADER`).
//!
//! A replay is the ordered sequence of verb lines dispatched against a
//! world, each tagged with the tick it was issued on. Replaying it against
//! a freshly bootstrapped world of the same template and seed reproduces
//! the same state, since every subsystem downstream of [`crate::verb::dispatch`]
//! is deterministic.

use std::fs;
use std::io;

const REPLAY_HEADER: &str = "DOMINIUM_REPLAY_V1";

/// One recorded dispatch: the tick it was issued on, and the verb line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayEntry {
    /// The world tick this entry was dispatched on.
    pub tick: u64,
    /// The raw verb line, exactly as passed to [`crate::verb::dispatch`].
    pub line: String,
}

/// Serializes `entries` as text to `path`, one line per entry after the
/// header, as `tick\tline`.
///
/// # Errors
/// Returns the underlying I/O error if `path` cannot be written.
pub fn save_replay(entries: &[ReplayEntry], path: &str) -> io::Result<()> {
    let mut out = String::new();
    out.push_str(REPLAY_HEADER);
    out.push('\n');
    for entry in entries {
        out.push_str(&format!("{}\t{}\n", entry.tick, entry.line));
    }
    fs::write(path, out)
}

/// Parses `path` back into the ordered [`ReplayEntry`] sequence it encodes.
///
/// # Errors
/// Returns `io::Error` (kind `InvalidData`) if the header is missing or a
/// line is malformed, or the underlying error if `path` cannot be read.
pub fn load_replay(path: &str) -> io::Result<Vec<ReplayEntry>> {
    let text = fs::read_to_string(path)?;
    let mut lines = text.lines();

    if lines.next() != Some(REPLAY_HEADER) {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "missing replay header"));
    }

    let mut entries = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let Some((tick_str, verb_line)) = line.split_once('\t') else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("malformed replay line: {line}"),
            ));
        };
        let tick = tick_str
            .parse()
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, format!("bad tick in: {line}")))?;
        entries.push(ReplayEntry {
            tick,
            line: verb_line.to_string(),
        });
    }

    Ok(entries)
}
