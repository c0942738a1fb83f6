use chrono::{DateTime, Utc};
use engine::{paginate, EntryQuery, LogAnalysis, LogEntry, Page, ParseStats};
use serde::Serialize;

use crate::error::IntakeResult;

/// Per-file analysis result, one JSON object per line on stdout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub name: String,
    pub size: u64,
    pub analyzed_at: DateTime<Utc>,
    pub analysis: LogAnalysis,
    pub parse_stats: ParseStats,
}

/// Output of one finished analysis job.
#[derive(Debug, Clone)]
pub struct Analyzed {
    pub record: AnalysisRecord,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntriesReport<'a> {
    pub name: &'a str,
    #[serde(flatten)]
    pub page: Page<&'a LogEntry>,
}

/// How results are rendered; built once from the command line.
#[derive(Debug, Clone, Default)]
pub struct ReportView {
    pub pretty: bool,
    /// `None` prints summaries only
    pub entries: Option<EntrySelection>,
}

#[derive(Debug, Clone)]
pub struct EntrySelection {
    pub query: EntryQuery,
    pub page: usize,
    pub per_page: usize,
}

impl ReportView {
    /// Rendered output lines for one file.
    pub fn render(&self, analyzed: &Analyzed) -> IntakeResult<Vec<String>> {
        let mut lines = vec![self.to_json(&analyzed.record)?];

        if let Some(selection) = &self.entries {
            let selected = selection.query.apply(&analyzed.entries)?;
            let report = EntriesReport {
                name: &analyzed.record.name,
                page: paginate(&selected, selection.page, selection.per_page),
            };
            lines.push(self.to_json(&report)?);
        }

        Ok(lines)
    }

    fn to_json<T: Serialize>(&self, value: &T) -> IntakeResult<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}
