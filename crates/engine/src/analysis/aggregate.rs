//! Level counts and overall time range in one forward pass.

use crate::parser::{LogEntry, LogLevel};

use super::model::TimeRange;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub error: u64,
    pub warn: u64,
    pub info: u64,
    pub debug: u64,
    pub unknown: u64,
}

impl LevelCounts {
    pub fn record(&mut self, level: LogLevel) {
        match level {
            LogLevel::Error => self.error += 1,
            LogLevel::Warn => self.warn += 1,
            LogLevel::Info => self.info += 1,
            LogLevel::Debug => self.debug += 1,
            LogLevel::Unknown => self.unknown += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.error + self.warn + self.info + self.debug + self.unknown
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub counts: LevelCounts,
    pub time_range: TimeRange,
}

/// Count levels and track min/max timestamp. Entries without a timestamp
/// only contribute to the counts.
pub fn aggregate(entries: &[LogEntry]) -> Aggregate {
    entries.iter().fold(Aggregate::default(), |mut acc, entry| {
        acc.counts.record(entry.level);
        if let Some(ts) = entry.timestamp {
            acc.time_range.include(ts);
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn entry(id: u64, level: LogLevel, ts: Option<DateTime<Utc>>) -> LogEntry {
        LogEntry {
            id,
            timestamp: ts,
            level,
            message: "m".to_string(),
            source: None,
            raw_line: "m".to_string(),
        }
    }

    #[test]
    fn test_empty_sequence() {
        let agg = aggregate(&[]);
        assert_eq!(agg.counts.total(), 0);
        assert!(agg.time_range.is_empty());
    }

    #[test]
    fn test_counts_every_level() {
        let entries = vec![
            entry(0, LogLevel::Error, None),
            entry(1, LogLevel::Error, None),
            entry(2, LogLevel::Warn, None),
            entry(3, LogLevel::Info, None),
            entry(4, LogLevel::Debug, None),
            entry(5, LogLevel::Unknown, None),
        ];
        let agg = aggregate(&entries);

        assert_eq!(agg.counts.error, 2);
        assert_eq!(agg.counts.warn, 1);
        assert_eq!(agg.counts.info, 1);
        assert_eq!(agg.counts.debug, 1);
        assert_eq!(agg.counts.unknown, 1);
        assert_eq!(agg.counts.total(), 6);
    }

    #[test]
    fn test_time_range_ignores_missing_and_order() {
        let late = Utc.with_ymd_and_hms(2024, 6, 3, 14, 30, 25).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 6, 3, 14, 30, 15).unwrap();
        let entries = vec![
            entry(0, LogLevel::Error, Some(late)),
            entry(1, LogLevel::Info, None),
            entry(2, LogLevel::Info, Some(early)),
        ];
        let agg = aggregate(&entries);

        assert_eq!(agg.time_range.start, Some(early));
        assert_eq!(agg.time_range.end, Some(late));
    }
}
