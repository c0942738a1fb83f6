use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Unknown,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Unknown => "UNKNOWN",
        }
    }

    /// Ordering weight used when sorting by severity (higher is more severe).
    pub fn severity(&self) -> u8 {
        match self {
            LogLevel::Error => 4,
            LogLevel::Warn => 3,
            LogLevel::Info => 2,
            LogLevel::Debug => 1,
            LogLevel::Unknown => 0,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical log event, possibly spanning several physical lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Position in the parsed output (dense, 0-based, encounter order)
    pub id: u64,

    /// Serializes as ISO-8601 string, `null` when the line carried none
    pub timestamp: Option<DateTime<Utc>>,

    pub level: LogLevel,

    /// Entry body with continuation lines appended, newline-joined
    pub message: String,

    /// Trailing `file.ext:LINE` origin token, if present
    pub source: Option<String>,

    /// First physical line, kept for diagnostics
    pub raw_line: String,
}

impl LogEntry {
    /// First line of the message (continuations excluded).
    pub fn headline(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// Provisional record produced by a line matcher. Borrows from the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCandidate<'a> {
    pub timestamp: Option<DateTime<Utc>>,
    pub level_token: Option<&'a str>,
    pub source: Option<&'a str>,
    pub message: &'a str,
}

impl<'a> EntryCandidate<'a> {
    /// Candidate for a line that matched no shape and has no entry to attach to.
    pub fn orphan(line: &'a str) -> Self {
        Self {
            timestamp: None,
            level_token: None,
            source: None,
            message: line.trim(),
        }
    }
}

/// Classification of one physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine<'a> {
    /// Starts a new entry; `shape` names the matcher that recognized it
    NewEntry {
        shape: &'static str,
        candidate: EntryCandidate<'a>,
    },
    /// Belongs to whatever entry is currently open
    Continuation(&'a str),
    /// Empty or whitespace-only; dropped
    Blank,
}
