/// Line-level parsing
///
/// Turns one physical line of log text into either the start of a new
/// entry or a continuation of the previous one.
///
/// # Architecture
///
/// - `traits.rs`: the `LineMatcher` seam every line shape implements
/// - `formats/`: the built-in line shapes, tried in order
/// - `timestamp.rs`: leading timestamp recognition
/// - `level.rs`: level token reading and classification
/// - `source.rs`: trailing `file:line` tokens
/// - `metrics.rs`: per-parse counters
///
/// Every function here is total over text input: an unrecognized line is
/// never an error, it is a continuation.

pub mod traits;
pub mod formats;
pub mod level;
pub mod metrics;
pub mod model;
pub mod source;
pub mod timestamp;

pub use level::classify;
pub use model::{EntryCandidate, LogEntry, LogLevel, ParsedLine};
pub use traits::LineMatcher;

use formats::{LevelLedLine, TimestampedLine};

/// Ordered cascade of line matchers.
pub struct LineParser {
    matchers: Vec<Box<dyn LineMatcher>>,
}

impl LineParser {
    /// Parser with no shapes at all: every non-blank line is a continuation.
    pub fn empty() -> Self {
        Self { matchers: Vec::new() }
    }

    /// Append a shape. It is tried after every shape already registered.
    pub fn with_matcher(mut self, matcher: impl LineMatcher + 'static) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    pub fn shape_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// Classify one physical line.
    pub fn parse_line<'a>(&self, line: &'a str) -> ParsedLine<'a> {
        if line.trim().is_empty() {
            return ParsedLine::Blank;
        }

        let line = line.trim_end();
        for matcher in &self.matchers {
            if let Some(candidate) = matcher.try_match(line) {
                return ParsedLine::NewEntry {
                    shape: matcher.name(),
                    candidate,
                };
            }
        }

        ParsedLine::Continuation(line)
    }
}

impl Default for LineParser {
    /// Timestamped lines first, then level-led lines.
    fn default() -> Self {
        Self::empty()
            .with_matcher(TimestampedLine)
            .with_matcher(LevelLedLine)
    }
}
