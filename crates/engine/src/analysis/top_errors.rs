//! Top recurring errors, grouped by message fingerprint.
//!
//! Fingerprint rule, version 1 ([`FINGERPRINT_VERSION`]), applied to the
//! entry headline (first message line; stack frames are not part of it):
//! 1. lower-case (ASCII)
//! 2. each maximal run of ASCII digits becomes `#`
//! 3. each maximal run of whitespace becomes a single space
//! 4. leading/trailing whitespace is trimmed
//!
//! So `"Timeout after 30s (req 8812)"` and `"timeout after 45s (req 9)"`
//! share the fingerprint `"timeout after #s (req #)"`. Changing any of these
//! steps must bump the version.

use std::collections::HashMap;

use crate::parser::{LogEntry, LogLevel};

use super::model::ErrorGroup;

pub const FINGERPRINT_VERSION: u32 = 1;
pub const DEFAULT_TOP_ERRORS: usize = 10;

const DIGIT_PLACEHOLDER: char = '#';

/// Normalized grouping key for an error message.
pub fn fingerprint(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut in_digits = false;
    let mut in_space = false;

    for c in message.trim().chars() {
        if c.is_ascii_digit() {
            if !in_digits {
                out.push(DIGIT_PLACEHOLDER);
            }
            in_digits = true;
            in_space = false;
        } else if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
            in_digits = false;
        } else {
            out.push(c.to_ascii_lowercase());
            in_digits = false;
            in_space = false;
        }
    }

    out
}

struct Group<'a> {
    representative: &'a str,
    count: u64,
    first_seen: u64,
}

/// Group ERROR entries by fingerprint and return the `limit` largest groups,
/// count descending, earlier first occurrence winning ties.
pub fn top_errors(entries: &[LogEntry], limit: usize) -> Vec<ErrorGroup> {
    let mut groups: HashMap<String, Group<'_>> = HashMap::new();

    for entry in entries.iter().filter(|e| e.level == LogLevel::Error) {
        let headline = entry.headline();
        groups
            .entry(fingerprint(headline))
            .and_modify(|g| g.count += 1)
            .or_insert(Group {
                representative: headline,
                count: 1,
                first_seen: entry.id,
            });
    }

    let mut ranked: Vec<Group<'_>> = groups.into_values().collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.first_seen.cmp(&b.first_seen)));
    ranked.truncate(limit);

    tracing::trace!(groups = ranked.len(), "top_errors: ranked error groups");

    ranked
        .into_iter()
        .map(|g| ErrorGroup {
            message: g.representative.to_string(),
            count: g.count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(id: u64, message: &str) -> LogEntry {
        LogEntry {
            id,
            timestamp: None,
            level: LogLevel::Error,
            message: message.to_string(),
            source: None,
            raw_line: message.to_string(),
        }
    }

    fn info(id: u64, message: &str) -> LogEntry {
        LogEntry {
            level: LogLevel::Info,
            ..error(id, message)
        }
    }

    // ─── Fingerprint rule ───────────────────────────────────────

    #[test]
    fn test_fingerprint_collapses_digits() {
        assert_eq!(fingerprint("timeout after 30s"), "timeout after #s");
        assert_eq!(fingerprint("timeout after 45s"), "timeout after #s");
        assert_eq!(fingerprint("port 8080 on 10.0.0.1"), "port # on #.#.#.#");
    }

    #[test]
    fn test_fingerprint_lowercases_and_collapses_whitespace() {
        assert_eq!(
            fingerprint("  Database   Connection\tTIMEOUT "),
            "database connection timeout"
        );
    }

    #[test]
    fn test_fingerprint_keeps_non_ascii() {
        assert_eq!(fingerprint("Échec 12 fois"), "Échec # fois");
    }

    #[test]
    fn test_fingerprint_empty() {
        assert_eq!(fingerprint(""), "");
        assert_eq!(fingerprint("   "), "");
    }

    // ─── Grouping ───────────────────────────────────────────────

    #[test]
    fn test_near_duplicates_collapse() {
        let entries = vec![error(0, "timeout after 30s"), error(1, "timeout after 45s")];
        let top = top_errors(&entries, DEFAULT_TOP_ERRORS);

        assert_eq!(
            top,
            vec![ErrorGroup {
                message: "timeout after 30s".to_string(),
                count: 2
            }]
        );
    }

    #[test]
    fn test_only_errors_counted() {
        let entries = vec![info(0, "timeout after 30s"), error(1, "timeout after 45s")];
        let top = top_errors(&entries, DEFAULT_TOP_ERRORS);

        assert_eq!(top.len(), 1);
        assert_eq!(top[0].count, 1);
        assert_eq!(top[0].message, "timeout after 45s");
    }

    #[test]
    fn test_sorted_by_count_then_first_seen() {
        let entries = vec![
            error(0, "alpha"),
            error(1, "beta"),
            error(2, "gamma"),
            error(3, "gamma"),
            error(4, "beta"),
            error(5, "delta"),
        ];
        let top = top_errors(&entries, DEFAULT_TOP_ERRORS);
        let order: Vec<(&str, u64)> = top.iter().map(|g| (g.message.as_str(), g.count)).collect();

        assert_eq!(order, vec![("beta", 2), ("gamma", 2), ("alpha", 1), ("delta", 1)]);
    }

    #[test]
    fn test_truncated_to_limit() {
        let entries: Vec<LogEntry> = (0..25)
            .map(|i| error(i, &format!("distinct failure {}", char::from(b'a' + (i as u8)))))
            .collect();
        let top = top_errors(&entries, DEFAULT_TOP_ERRORS);

        assert_eq!(top.len(), 10);
        assert_eq!(top[0].message, "distinct failure a");
        assert_eq!(top[9].message, "distinct failure j");
    }

    #[test]
    fn test_stack_trace_excluded_from_fingerprint() {
        let entries = vec![
            error(0, "NullPointerException\n\tat a.B.c(B.java:1)"),
            error(1, "NullPointerException\n\tat x.Y.z(Y.java:99)"),
        ];
        let top = top_errors(&entries, DEFAULT_TOP_ERRORS);

        assert_eq!(top.len(), 1);
        assert_eq!(top[0].count, 2);
        assert_eq!(top[0].message, "NullPointerException");
    }

    #[test]
    fn test_no_errors() {
        assert!(top_errors(&[info(0, "fine")], DEFAULT_TOP_ERRORS).is_empty());
        assert!(top_errors(&[], DEFAULT_TOP_ERRORS).is_empty());
    }
}
