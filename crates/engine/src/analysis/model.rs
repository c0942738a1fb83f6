use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary derived from exactly one entry sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAnalysis {
    pub total_entries: u64,
    pub error_count: u64,
    pub warning_count: u64,
    pub info_count: u64,
    pub debug_count: u64,
    pub unknown_count: u64,
    pub time_range: TimeRange,
    pub top_errors: Vec<ErrorGroup>,
    pub time_series_data: Vec<TimeBucket>,
    /// Width picked by the bucket policy; `None` when the series is empty
    pub bucket_width_seconds: Option<u64>,
    /// Version of the message fingerprint rule behind `top_errors`
    pub fingerprint_version: u32,
}

/// Earliest and latest timestamp seen. Both `None` when no entry had one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() || self.end.is_none()
    }

    /// `(start, end)` when the range is populated.
    pub fn bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.start?, self.end?))
    }

    /// Widen the range to include `ts`.
    pub fn include(&mut self, ts: DateTime<Utc>) {
        self.start = Some(self.start.map_or(ts, |s| s.min(ts)));
        self.end = Some(self.end.map_or(ts, |e| e.max(ts)));
    }
}

/// One top-error row: representative message and how many entries shared its fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorGroup {
    pub message: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBucket {
    /// Bucket start
    pub timestamp: DateTime<Utc>,
    pub error_count: u64,
    pub warning_count: u64,
    pub info_count: u64,
}

impl TimeBucket {
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            error_count: 0,
            warning_count: 0,
            info_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_range_include() {
        let mut range = TimeRange::default();
        assert!(range.is_empty());

        let a = Utc.with_ymd_and_hms(2024, 6, 3, 14, 30, 25).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 6, 3, 14, 30, 15).unwrap();
        range.include(a);
        range.include(b);

        assert_eq!(range.bounds(), Some((b, a)));
    }

    #[test]
    fn test_serialized_shape() {
        let bucket = TimeBucket::empty(Utc.with_ymd_and_hms(2024, 6, 3, 14, 30, 0).unwrap());
        let json = serde_json::to_value(&bucket).unwrap();

        assert_eq!(json["timestamp"], "2024-06-03T14:30:00Z");
        assert_eq!(json["errorCount"], 0);
        assert_eq!(json["warningCount"], 0);
        assert_eq!(json["infoCount"], 0);
    }

    #[test]
    fn test_empty_time_range_serializes_nulls() {
        let json = serde_json::to_value(TimeRange::default()).unwrap();
        assert!(json["start"].is_null());
        assert!(json["end"].is_null());
    }
}
