//! Runner: analysis jobs on Tokio's blocking pool, last submission wins.
//!
//! Each `submit` cancels the job submitted before it. A cancelled job stops
//! at the next line boundary and resolves to [`Outcome::Superseded`]; its
//! partial work is thrown away.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use engine::{analyze_with, parse_with, AnalysisOptions, CancellationSignal, EngineError};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::IntakeResult;
use crate::report::{AnalysisRecord, Analyzed};
use crate::upload::Upload;

/// Engine-side view of a [`CancellationToken`].
#[derive(Debug, Clone)]
pub struct TokenSignal(CancellationToken);

impl CancellationSignal for TokenSignal {
    fn is_cancelled(&self) -> bool {
        self.0.is_cancelled()
    }
}

#[derive(Debug)]
pub enum Outcome {
    Completed(Box<Analyzed>),
    Superseded,
}

/// Handle to a submitted job.
pub struct Job {
    pub id: u64,
    handle: JoinHandle<IntakeResult<Outcome>>,
}

impl Job {
    pub async fn outcome(self) -> IntakeResult<Outcome> {
        self.handle.await?
    }
}

pub struct AnalysisRunner {
    options: AnalysisOptions,
    current: Mutex<Option<CancellationToken>>,
    submitted: AtomicU64,
}

impl AnalysisRunner {
    pub fn new(options: AnalysisOptions) -> Self {
        Self {
            options,
            current: Mutex::new(None),
            submitted: AtomicU64::new(0),
        }
    }

    /// Start analyzing `upload`, superseding whatever job is still running.
    pub fn submit(&self, upload: Upload) -> Job {
        let id = self.submitted.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        if let Some(previous) = self.current.lock().replace(token.clone()) {
            previous.cancel();
        }

        let options = self.options.clone();
        let handle = tokio::task::spawn_blocking(move || run_job(id, upload, &options, TokenSignal(token)));

        debug!(job = id, "Analysis job submitted");
        Job { id, handle }
    }

    /// Cancel the in-flight job, if any.
    pub fn cancel(&self) {
        if let Some(token) = self.current.lock().take() {
            token.cancel();
        }
    }
}

fn run_job(id: u64, upload: Upload, options: &AnalysisOptions, signal: TokenSignal) -> IntakeResult<Outcome> {
    let (entries, parse_stats) = match parse_with(&upload.text, &signal) {
        Ok(parsed) => parsed,
        Err(EngineError::Cancelled(lines)) => {
            warn!(job = id, file = %upload.name, lines, "Analysis superseded during parse");
            return Ok(Outcome::Superseded);
        }
        Err(e) => return Err(e.into()),
    };

    let analysis = analyze_with(&entries, options);

    // a newer submission arrived while analyzing; drop this result
    if signal.is_cancelled() {
        warn!(job = id, file = %upload.name, "Analysis superseded before completion");
        return Ok(Outcome::Superseded);
    }

    debug!(
        job = id,
        file = %upload.name,
        entries = entries.len(),
        recognized = format!("{:.1}%", parse_stats.recognition_rate() * 100.0),
        "Analysis completed"
    );

    Ok(Outcome::Completed(Box::new(Analyzed {
        record: AnalysisRecord {
            name: upload.name,
            size: upload.size,
            analyzed_at: Utc::now(),
            analysis,
            parse_stats,
        },
        entries,
    })))
}
