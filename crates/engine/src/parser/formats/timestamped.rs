use crate::parser::level::{read_level_token, TokenCase};
use crate::parser::source::split_trailing_source;
use crate::parser::timestamp::read_leading_timestamp;
use crate::parser::traits::*;

/// `<timestamp> <level>? <message> <file:line>?`
///
/// A timestamp alone is enough to start an entry; the level token that
/// follows it may be bracketed or bare, in any case.
pub struct TimestampedLine;

impl LineMatcher for TimestampedLine {
    fn try_match<'a>(&self, line: &'a str) -> Option<EntryCandidate<'a>> {
        let (timestamp, rest) = read_leading_timestamp(line)?;

        let (level_token, body) = match read_level_token(rest, TokenCase::Any) {
            Some((token, body)) => (Some(token), body),
            None => (None, rest),
        };
        let (message, source) = split_trailing_source(body);

        Some(EntryCandidate {
            timestamp: Some(timestamp),
            level_token,
            source,
            message,
        })
    }

    fn name(&self) -> &'static str {
        "timestamped"
    }
}
