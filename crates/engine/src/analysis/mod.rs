//! Analysis: summary statistics over an assembled entry sequence.
//!
//! Pure and deterministic: the same entries always give the same
//! [`LogAnalysis`]. Three independent reductions feed it:
//! - [`aggregate`] level counts and overall time range
//! - [`top_errors`] fingerprint-grouped ERROR messages
//! - [`buckets`] adaptive zero-filled time series

pub mod aggregate;
pub mod buckets;
pub mod model;
pub mod top_errors;

use serde::{Deserialize, Serialize};

use crate::parser::LogEntry;

pub use model::{ErrorGroup, LogAnalysis, TimeBucket, TimeRange};
pub use top_errors::{fingerprint, DEFAULT_TOP_ERRORS, FINGERPRINT_VERSION};

/// Tunables for [`analyze_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub top_error_limit: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_error_limit: DEFAULT_TOP_ERRORS,
        }
    }
}

impl AnalysisOptions {
    pub fn validate(&self) -> Result<(), String> {
        if self.top_error_limit == 0 {
            return Err("analysis.top_error_limit must be > 0".to_string());
        }
        Ok(())
    }
}

/// Analyze with default options.
pub fn analyze(entries: &[LogEntry]) -> LogAnalysis {
    analyze_with(entries, &AnalysisOptions::default())
}

pub fn analyze_with(entries: &[LogEntry], options: &AnalysisOptions) -> LogAnalysis {
    let agg = aggregate::aggregate(entries);
    let top = top_errors::top_errors(entries, options.top_error_limit);
    let (series, width) = buckets::bucketize(entries, &agg.time_range);

    tracing::debug!(
        entries = entries.len(),
        errors = agg.counts.error,
        groups = top.len(),
        buckets = series.len(),
        "analyze: summary built"
    );

    LogAnalysis {
        total_entries: agg.counts.total(),
        error_count: agg.counts.error,
        warning_count: agg.counts.warn,
        info_count: agg.counts.info,
        debug_count: agg.counts.debug,
        unknown_count: agg.counts.unknown,
        time_range: agg.time_range,
        top_errors: top,
        time_series_data: series,
        bucket_width_seconds: width.and_then(|w| u64::try_from(w.num_seconds()).ok()),
        fingerprint_version: FINGERPRINT_VERSION,
    }
}
