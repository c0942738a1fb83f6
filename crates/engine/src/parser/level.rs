//! Level token recognition and classification.

use super::model::LogLevel;

/// Recognized level tokens (matched case-insensitively).
const LEVEL_ALIASES: &[(&str, LogLevel)] = &[
    ("ERROR", LogLevel::Error),
    ("ERR", LogLevel::Error),
    ("FATAL", LogLevel::Error),
    ("CRITICAL", LogLevel::Error),
    ("WARN", LogLevel::Warn),
    ("WARNING", LogLevel::Warn),
    ("INFO", LogLevel::Info),
    ("DEBUG", LogLevel::Debug),
    ("TRACE", LogLevel::Debug),
];

// Longest alias plus brackets; anything longer cannot be a level token.
const MAX_BRACKETED_TOKEN: usize = 16;

/// Map a raw level token to its canonical level. Total: anything
/// unrecognized, including an absent token, is `Unknown`.
pub fn classify(token: Option<&str>) -> LogLevel {
    let Some(token) = token else {
        return LogLevel::Unknown;
    };
    let token = token.trim();
    LEVEL_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(token))
        .map(|(_, level)| *level)
        .unwrap_or(LogLevel::Unknown)
}

fn is_level_token(token: &str) -> bool {
    classify(Some(token)) != LogLevel::Unknown
}

/// How strictly a bare (unbracketed) level word must be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCase {
    /// `error`, `Error` and `ERROR` all count
    Any,
    /// Only `ERROR`; keeps prose like "Error while..." from starting an entry
    Upper,
}

/// Read a level token at the start of `text`.
///
/// Accepts `[ERROR]` (any case) or a bare word followed by whitespace,
/// `:` or end of line. Returns the token and the remaining text with any
/// `:` / `-` separator and surrounding whitespace removed.
pub fn read_level_token(text: &str, case: TokenCase) -> Option<(&str, &str)> {
    if let Some(inner) = text.strip_prefix('[') {
        let close = inner.find(']')?;
        if close + 2 > MAX_BRACKETED_TOKEN {
            return None;
        }
        let token = inner[..close].trim();
        if !is_level_token(token) {
            return None;
        }
        return Some((token, strip_separator(&inner[close + 1..])));
    }

    let end = text
        .find(|c: char| c.is_whitespace() || c == ':')
        .unwrap_or(text.len());
    let word = &text[..end];
    if word.is_empty() || !is_level_token(word) {
        return None;
    }
    if case == TokenCase::Upper && word.bytes().any(|b| b.is_ascii_lowercase()) {
        return None;
    }
    Some((word, strip_separator(&text[end..])))
}

/// Drop one leading `:` or `-` separator and the whitespace around it.
fn strip_separator(rest: &str) -> &str {
    let rest = rest.trim_start();
    for sep in [':', '-'] {
        if let Some(after) = rest.strip_prefix(sep) {
            if after.is_empty() || after.starts_with(char::is_whitespace) {
                return after.trim_start();
            }
        }
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─── classify ───────────────────────────────────────────────

    #[test]
    fn test_canonical_tokens() {
        assert_eq!(classify(Some("ERROR")), LogLevel::Error);
        assert_eq!(classify(Some("WARN")), LogLevel::Warn);
        assert_eq!(classify(Some("INFO")), LogLevel::Info);
        assert_eq!(classify(Some("DEBUG")), LogLevel::Debug);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(classify(Some("WARNING")), LogLevel::Warn);
        assert_eq!(classify(Some("ERR")), LogLevel::Error);
        assert_eq!(classify(Some("FATAL")), LogLevel::Error);
        assert_eq!(classify(Some("CRITICAL")), LogLevel::Error);
        assert_eq!(classify(Some("TRACE")), LogLevel::Debug);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify(Some("error")), LogLevel::Error);
        assert_eq!(classify(Some("Warning")), LogLevel::Warn);
        assert_eq!(classify(Some("tRaCe")), LogLevel::Debug);
    }

    #[test]
    fn test_unrecognized_and_absent() {
        assert_eq!(classify(None), LogLevel::Unknown);
        assert_eq!(classify(Some("")), LogLevel::Unknown);
        assert_eq!(classify(Some("NOTICE")), LogLevel::Unknown);
        assert_eq!(classify(Some("information")), LogLevel::Unknown);
    }

    // ─── read_level_token ───────────────────────────────────────

    #[test]
    fn test_bracketed_token() {
        assert_eq!(
            read_level_token("[ERROR] db down", TokenCase::Upper),
            Some(("ERROR", "db down"))
        );
        assert_eq!(
            read_level_token("[warn] disk", TokenCase::Upper),
            Some(("warn", "disk"))
        );
    }

    #[test]
    fn test_bare_token_with_colon() {
        assert_eq!(
            read_level_token("ERROR: something broke", TokenCase::Any),
            Some(("ERROR", "something broke"))
        );
    }

    #[test]
    fn test_bare_token_with_dash_separator() {
        assert_eq!(
            read_level_token("INFO - started", TokenCase::Any),
            Some(("INFO", "started"))
        );
    }

    #[test]
    fn test_only_level_word() {
        assert_eq!(read_level_token("WARN", TokenCase::Upper), Some(("WARN", "")));
    }

    #[test]
    fn test_word_boundary() {
        assert!(read_level_token("information is key", TokenCase::Any).is_none());
        assert!(read_level_token("warning_count=5", TokenCase::Any).is_none());
        assert!(read_level_token("debuggable item", TokenCase::Any).is_none());
    }

    #[test]
    fn test_upper_case_requirement() {
        assert!(read_level_token("Error while reading", TokenCase::Upper).is_none());
        assert!(read_level_token("error while reading", TokenCase::Upper).is_none());
        assert!(read_level_token("Error while reading", TokenCase::Any).is_some());
    }

    #[test]
    fn test_bracketed_non_level() {
        assert!(read_level_token("[main] started", TokenCase::Any).is_none());
        assert!(read_level_token("[a very long bracketed segment] x", TokenCase::Any).is_none());
        assert!(read_level_token("[ERROR unterminated", TokenCase::Any).is_none());
    }

    #[test]
    fn test_dash_inside_message_kept() {
        assert_eq!(
            read_level_token("INFO -5 degrees", TokenCase::Any),
            Some(("INFO", "-5 degrees"))
        );
    }
}
