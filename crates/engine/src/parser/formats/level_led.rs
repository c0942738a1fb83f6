use crate::parser::level::{read_level_token, TokenCase};
use crate::parser::source::split_trailing_source;
use crate::parser::traits::*;

/// `<LEVEL> <message> <file:line>?` with no timestamp.
///
/// Bare level words must be upper-case: a prose line such as
/// "Error while reading config" stays a continuation.
pub struct LevelLedLine;

impl LineMatcher for LevelLedLine {
    fn try_match<'a>(&self, line: &'a str) -> Option<EntryCandidate<'a>> {
        let (token, body) = read_level_token(line, TokenCase::Upper)?;
        let (message, source) = split_trailing_source(body);

        Some(EntryCandidate {
            timestamp: None,
            level_token: Some(token),
            source,
            message,
        })
    }

    fn name(&self) -> &'static str {
        "level_led"
    }
}
