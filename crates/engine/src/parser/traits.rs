pub use super::model::{EntryCandidate, LogEntry, LogLevel, ParsedLine};

/// One recognized line shape. Matchers are tried in order; the first one
/// returning `Some` wins.
pub trait LineMatcher: Send + Sync {
    /// Try to read `line` as the start of a new entry.
    fn try_match<'a>(&self, line: &'a str) -> Option<EntryCandidate<'a>>;
    fn name(&self) -> &'static str;
}
