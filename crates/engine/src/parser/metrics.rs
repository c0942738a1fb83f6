use std::collections::BTreeMap;
use serde::Serialize;

/// Counters collected over one parse call, returned alongside its entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Physical lines seen, blank ones included
    pub lines_scanned: u64,
    pub blank_lines: u64,
    /// Lines folded into the message of the open entry
    pub continuation_lines: u64,
    /// Continuation lines with no entry to attach to (became UNKNOWN entries)
    pub orphan_lines: u64,
    pub entries_emitted: u64,
    /// Entries started per line shape
    pub shape_matches: BTreeMap<&'static str, u64>,
}

impl ParseStats {
    pub fn record_shape(&mut self, shape: &'static str) {
        *self.shape_matches.entry(shape).or_insert(0) += 1;
    }

    /// Share of non-blank lines that were recognized as entry headers.
    pub fn recognition_rate(&self) -> f64 {
        let content_lines = self.lines_scanned.saturating_sub(self.blank_lines);
        if content_lines == 0 {
            return 0.0;
        }
        let recognized: u64 = self.shape_matches.values().sum();
        recognized as f64 / content_lines as f64
    }
}
