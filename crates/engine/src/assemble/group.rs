//! Entry assembler for multi-line log events.
//!
//! Drives the [`LineParser`] over a whole buffer:
//! - lines recognized as entry headers open a new entry
//! - anything else is appended to the open entry (stack frames, wrapped text)
//! - a continuation with nothing open becomes its own `UNKNOWN` entry
//! - blank lines are dropped
//!
//! Entries come out in encounter order with dense ids; the assembler never
//! reorders by timestamp.

use chrono::{DateTime, Utc};

use crate::error::{EngineError, EngineResult};
use crate::parser::level::classify;
use crate::parser::metrics::ParseStats;
use crate::parser::{EntryCandidate, LineParser, LogEntry, LogLevel, ParsedLine};

use super::cancel::{CancellationSignal, Never};

pub struct EntryAssembler<'p> {
    parser: &'p LineParser,
}

impl<'p> EntryAssembler<'p> {
    pub fn new(parser: &'p LineParser) -> Self {
        Self { parser }
    }

    /// Assemble the whole buffer. Total over text input.
    pub fn assemble(&self, buffer: &str) -> (Vec<LogEntry>, ParseStats) {
        match self.assemble_with(buffer, &Never) {
            Ok(result) => result,
            // Never cannot fire
            Err(_) => (Vec::new(), ParseStats::default()),
        }
    }

    /// Assemble, checking `signal` before each physical line.
    pub fn assemble_with<S>(&self, buffer: &str, signal: &S) -> EngineResult<(Vec<LogEntry>, ParseStats)>
    where
        S: CancellationSignal + ?Sized,
    {
        let mut scan = Scan::default();

        for line in buffer.lines() {
            if signal.is_cancelled() {
                tracing::debug!(
                    lines = scan.stats.lines_scanned,
                    "assemble: cancelled, discarding partial result"
                );
                return Err(EngineError::Cancelled(scan.stats.lines_scanned));
            }
            scan.accept(self.parser.parse_line(line), line);
        }

        let (entries, stats) = scan.finish();
        tracing::debug!(
            lines = stats.lines_scanned,
            entries = stats.entries_emitted,
            blank = stats.blank_lines,
            continuations = stats.continuation_lines,
            orphans = stats.orphan_lines,
            "assemble: buffer parsed"
        );
        Ok((entries, stats))
    }
}

/// Scan state carried from one line to the next.
#[derive(Default)]
struct Scan {
    open: Option<OpenEntry>,
    entries: Vec<LogEntry>,
    stats: ParseStats,
}

impl Scan {
    fn accept(&mut self, parsed: ParsedLine<'_>, raw: &str) {
        self.stats.lines_scanned += 1;

        match parsed {
            ParsedLine::Blank => {
                self.stats.blank_lines += 1;
            }
            ParsedLine::NewEntry { shape, candidate } => {
                self.stats.record_shape(shape);
                self.start(OpenEntry::from_candidate(candidate, raw));
            }
            ParsedLine::Continuation(text) => match self.open {
                Some(ref mut open) => {
                    self.stats.continuation_lines += 1;
                    open.append(text);
                }
                None => {
                    self.stats.orphan_lines += 1;
                    self.start(OpenEntry::from_candidate(EntryCandidate::orphan(text), raw));
                }
            },
        }
    }

    fn start(&mut self, entry: OpenEntry) {
        self.emit();
        self.open = Some(entry);
    }

    fn emit(&mut self) {
        if let Some(open) = self.open.take() {
            let id = self.entries.len() as u64;
            self.entries.push(open.into_entry(id));
            self.stats.entries_emitted += 1;
        }
    }

    fn finish(mut self) -> (Vec<LogEntry>, ParseStats) {
        self.emit();
        (self.entries, self.stats)
    }
}

/// Entry still accepting continuation lines.
struct OpenEntry {
    timestamp: Option<DateTime<Utc>>,
    level: LogLevel,
    message: String,
    source: Option<String>,
    raw_line: String,
}

impl OpenEntry {
    fn from_candidate(candidate: EntryCandidate<'_>, raw: &str) -> Self {
        Self {
            timestamp: candidate.timestamp,
            level: classify(candidate.level_token),
            message: candidate.message.to_string(),
            source: candidate.source.map(str::to_string),
            raw_line: raw.trim_end().to_string(),
        }
    }

    fn append(&mut self, line: &str) {
        self.message.push('\n');
        self.message.push_str(line);
    }

    fn into_entry(self, id: u64) -> LogEntry {
        LogEntry {
            id,
            timestamp: self.timestamp,
            level: self.level,
            message: self.message,
            source: self.source,
            raw_line: self.raw_line,
        }
    }
}
