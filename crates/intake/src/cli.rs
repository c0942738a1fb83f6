use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use engine::filter::{KeywordMatcher, DEFAULT_PER_PAGE};
use engine::parser::classify;
use engine::parser::timestamp::read_leading_timestamp;
use engine::{EntryQuery, LogLevel, SortOrder};

use crate::error::IntakeResult;
use crate::report::{EntrySelection, ReportView};

#[derive(Parser, Debug, Clone)]
#[command(name = "logscope", author, version, about = "Parse log files and summarize them as JSON", long_about = None)]
pub struct Cli {
    /// Log files to analyze (.log / .txt by default)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Also print a page of parsed entries
    #[arg(long)]
    pub entries: bool,

    /// Only entries of this level (error, warn, info, debug, unknown)
    #[arg(long, value_parser = parse_level, requires = "entries")]
    pub level: Option<LogLevel>,

    /// Case-insensitive regex over message and source
    #[arg(long, requires = "entries")]
    pub keyword: Option<String>,

    /// Earliest timestamp, inclusive (RFC 3339, "YYYY-MM-DD HH:MM:SS" or "YYYY-MM-DD")
    #[arg(long, value_parser = parse_instant, requires = "entries")]
    pub since: Option<DateTime<Utc>>,

    /// Latest timestamp, inclusive
    #[arg(long, value_parser = parse_instant, requires = "entries")]
    pub until: Option<DateTime<Utc>>,

    /// Entry order: original, time-asc, time-desc, severity
    #[arg(long, default_value = "original")]
    pub sort: SortOrder,

    /// 1-based page of entries
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: usize,

    /// Re-analyze the file whenever it changes (single file only)
    #[arg(long)]
    pub follow: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Override analysis.top_error_limit
    #[arg(long, env = "LOGSCOPE_TOP_ERRORS")]
    pub top_errors: Option<usize>,
}

impl Cli {
    /// Output settings; fails early on an invalid keyword pattern.
    pub fn view(&self) -> IntakeResult<ReportView> {
        let entries = if self.entries {
            if let Some(pattern) = &self.keyword {
                KeywordMatcher::new(pattern)?;
            }
            Some(EntrySelection {
                query: EntryQuery {
                    level: self.level,
                    keyword: self.keyword.clone(),
                    since: self.since,
                    until: self.until,
                    sort: self.sort,
                },
                page: self.page,
                per_page: self.per_page,
            })
        } else {
            None
        };

        Ok(ReportView {
            pretty: self.pretty,
            entries,
        })
    }
}

fn parse_level(s: &str) -> Result<LogLevel, String> {
    match classify(Some(s)) {
        LogLevel::Unknown if !s.trim().eq_ignore_ascii_case("unknown") => {
            Err(format!("unknown level '{}'", s))
        }
        level => Ok(level),
    }
}

/// Date-only values mean midnight UTC.
fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if let Some((ts, rest)) = read_leading_timestamp(s) {
        if rest.is_empty() {
            return Ok(ts);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("cannot read '{}' as a timestamp", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("logscope").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_files_required() {
        assert!(Cli::try_parse_from(["logscope"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let c = cli(&["app.log"]);
        assert_eq!(c.files, vec![PathBuf::from("app.log")]);
        assert_eq!(c.sort, SortOrder::Original);
        assert_eq!(c.page, 1);
        assert_eq!(c.per_page, 100);
        assert!(!c.follow);
        assert!(c.view().unwrap().entries.is_none());
    }

    #[test]
    fn test_entry_flags() {
        let c = cli(&[
            "--entries",
            "--level",
            "warning",
            "--keyword",
            "timeout",
            "--since",
            "2024-06-03",
            "--until",
            "2024-06-03T15:00:00Z",
            "--sort",
            "time-desc",
            "--page",
            "2",
            "app.log",
        ]);
        let selection = c.view().unwrap().entries.unwrap();

        assert_eq!(selection.query.level, Some(LogLevel::Warn));
        assert_eq!(selection.query.keyword.as_deref(), Some("timeout"));
        assert_eq!(selection.query.since, Some(Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap()));
        assert_eq!(selection.query.until, Some(Utc.with_ymd_and_hms(2024, 6, 3, 15, 0, 0).unwrap()));
        assert_eq!(selection.query.sort, SortOrder::TimeDesc);
        assert_eq!(selection.page, 2);
    }

    #[test]
    fn test_filters_require_entries_flag() {
        assert!(Cli::try_parse_from(["logscope", "--level", "error", "app.log"]).is_err());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["logscope", "--entries", "--level", "loud", "a.log"]).is_err());
        assert!(Cli::try_parse_from(["logscope", "--sort", "random", "a.log"]).is_err());
        assert!(Cli::try_parse_from(["logscope", "--entries", "--since", "yesterday", "a.log"]).is_err());
    }

    #[test]
    fn test_invalid_keyword_fails_view() {
        let c = cli(&["--entries", "--keyword", "[oops", "app.log"]);
        assert!(c.view().is_err());
    }

    #[test]
    fn test_parse_instant_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 3, 14, 30, 0).unwrap();
        assert_eq!(parse_instant("2024-06-03 14:30:00").unwrap(), expected);
        assert_eq!(parse_instant("2024-06-03T16:30:00+02:00").unwrap(), expected);
        assert!(parse_instant("2024-06-03 14:30:00 trailing").is_err());
    }

    #[test]
    fn test_parse_level_accepts_unknown() {
        assert_eq!(parse_level("unknown").unwrap(), LogLevel::Unknown);
        assert_eq!(parse_level("ERR").unwrap(), LogLevel::Error);
    }
}
