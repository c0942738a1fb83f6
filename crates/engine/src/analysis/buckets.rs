//! Adaptive fixed-width time buckets.
//!
//! Width policy ([`width_for`]), by span `end - start`:
//!
//! | span            | width                              |
//! |-----------------|------------------------------------|
//! | ≤ 2 hours       | 5 minutes                          |
//! | ≤ 2 days        | 1 hour                             |
//! | ≤ 31 days       | 1 day                              |
//! | longer          | `max(1, ceil(weeks / 200))` weeks  |
//!
//! Bucket starts are multiples of the width counted from Monday
//! 1970-01-05T00:00:00Z, so daily buckets start at midnight UTC and weekly
//! buckets on Mondays.

use chrono::{DateTime, Duration, Utc};

use crate::parser::{LogEntry, LogLevel};

use super::model::{TimeBucket, TimeRange};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Upper bound on weekly buckets before the week multiple grows.
const MAX_WEEKLY_BUCKETS: i64 = 200;

/// Unix seconds of Monday 1970-01-05T00:00:00Z.
const ALIGN_ORIGIN: i64 = 4 * DAY;

/// Bucket width for `range`; `None` when the range is empty.
pub fn width_for(range: &TimeRange) -> Option<Duration> {
    let (start, end) = range.bounds()?;
    let span = (end - start).num_seconds().max(0);

    let width = if span <= 2 * HOUR {
        5 * MINUTE
    } else if span <= 2 * DAY {
        HOUR
    } else if span <= 31 * DAY {
        DAY
    } else {
        let weeks = ceil_div(span, WEEK);
        WEEK * ceil_div(weeks, MAX_WEEKLY_BUCKETS).max(1)
    };

    Some(Duration::seconds(width))
}

/// Per-bucket ERROR/WARN/INFO counts covering `range` with no gaps.
///
/// Returns the buckets and the width used. Entries without a timestamp are
/// skipped. An empty range gives an empty series.
pub fn bucketize(entries: &[LogEntry], range: &TimeRange) -> (Vec<TimeBucket>, Option<Duration>) {
    let (Some((start, end)), Some(width)) = (range.bounds(), width_for(range)) else {
        return (Vec::new(), None);
    };
    let w = width.num_seconds();

    let first = floor_secs(start, w);
    let last = floor_secs(end, w);
    let count = (last - first) / w + 1;

    let Some(first_start) = DateTime::from_timestamp(first, 0) else {
        return (Vec::new(), None);
    };
    let mut buckets: Vec<TimeBucket> = (0..count)
        .map_while(|i| first_start.checked_add_signed(Duration::seconds(i * w)))
        .map(TimeBucket::empty)
        .collect();

    for entry in entries {
        let Some(ts) = entry.timestamp else { continue };
        let index = (floor_secs(ts, w) - first) / w;
        let Some(bucket) = usize::try_from(index).ok().and_then(|i| buckets.get_mut(i)) else {
            continue;
        };
        match entry.level {
            LogLevel::Error => bucket.error_count += 1,
            LogLevel::Warn => bucket.warning_count += 1,
            LogLevel::Info => bucket.info_count += 1,
            LogLevel::Debug | LogLevel::Unknown => {}
        }
    }

    tracing::trace!(buckets = buckets.len(), width_secs = w, "bucketize: series built");
    (buckets, Some(width))
}

/// Start (unix seconds) of the aligned bucket containing `ts`.
fn floor_secs(ts: DateTime<Utc>, width: i64) -> i64 {
    let offset = ts.timestamp() - ALIGN_ORIGIN;
    offset.div_euclid(width) * width + ALIGN_ORIGIN
}

fn ceil_div(a: i64, b: i64) -> i64 {
    (a + b - 1) / b
}
