use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::{LogEntry, LogLevel};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),
    #[error("Unknown sort order: {0} (expected original, time-asc, time-desc or severity)")]
    UnknownSort(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Encounter order (entry id)
    #[default]
    Original,
    /// Oldest first, entries without a timestamp last
    TimeAsc,
    /// Newest first, entries without a timestamp last
    TimeDesc,
    /// ERROR first, UNKNOWN last
    Severity,
}

impl FromStr for SortOrder {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(Self::Original),
            "time-asc" | "asc" => Ok(Self::TimeAsc),
            "time-desc" | "desc" => Ok(Self::TimeDesc),
            "severity" | "level" => Ok(Self::Severity),
            other => Err(FilterError::UnknownSort(other.to_string())),
        }
    }
}

/// Case-insensitive keyword regex over an entry's message and source.
pub struct KeywordMatcher {
    matcher: RegexMatcher,
}

impl KeywordMatcher {
    pub fn new(pattern: &str) -> Result<Self, FilterError> {
        let matcher = RegexMatcherBuilder::new()
            .case_insensitive(true)
            .multi_line(true)
            .build(pattern)
            .map_err(|e| FilterError::InvalidRegex(e.to_string()))?;

        Ok(Self { matcher })
    }

    #[inline]
    pub fn matches(&self, entry: &LogEntry) -> bool {
        let hit = |text: &str| self.matcher.is_match(text.as_bytes()).unwrap_or(false);
        hit(&entry.message) || entry.source.as_deref().is_some_and(hit)
    }
}

/// Selection and ordering over a parsed entry slice. All criteria are
/// optional; the default query keeps everything in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryQuery {
    pub level: Option<LogLevel>,
    pub keyword: Option<String>,
    /// Inclusive lower bound
    pub since: Option<DateTime<Utc>>,
    /// Inclusive upper bound
    pub until: Option<DateTime<Utc>>,
    pub sort: SortOrder,
}

impl EntryQuery {
    /// Matching entries in the requested order. Fails only on a bad keyword pattern.
    pub fn apply<'a>(&self, entries: &'a [LogEntry]) -> Result<Vec<&'a LogEntry>, FilterError> {
        let keyword = match self.keyword.as_deref().map(str::trim) {
            Some(pattern) if !pattern.is_empty() => Some(KeywordMatcher::new(pattern)?),
            _ => None,
        };

        let mut selected: Vec<&LogEntry> = entries
            .iter()
            .filter(|e| self.level.map_or(true, |level| e.level == level))
            .filter(|e| self.in_range(e))
            .filter(|e| keyword.as_ref().map_or(true, |k| k.matches(e)))
            .collect();

        match self.sort {
            SortOrder::Original => selected.sort_by_key(|e| e.id),
            SortOrder::TimeAsc => selected.sort_by(|a, b| by_time(a, b, false)),
            SortOrder::TimeDesc => selected.sort_by(|a, b| by_time(a, b, true)),
            SortOrder::Severity => selected.sort_by(|a, b| b.level.severity().cmp(&a.level.severity())),
        }

        tracing::debug!(
            scanned = entries.len(),
            selected = selected.len(),
            sort = ?self.sort,
            "filter: query applied"
        );
        Ok(selected)
    }

    fn in_range(&self, entry: &LogEntry) -> bool {
        if self.since.is_none() && self.until.is_none() {
            return true;
        }
        let Some(ts) = entry.timestamp else {
            return false;
        };
        self.since.map_or(true, |s| ts >= s) && self.until.map_or(true, |u| ts <= u)
    }
}

fn by_time(a: &LogEntry, b: &LogEntry, newest_first: bool) -> Ordering {
    match (a.timestamp, b.timestamp) {
        (Some(x), Some(y)) if newest_first => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
