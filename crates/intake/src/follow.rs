use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::IntakeConfig;
use crate::report::Analyzed;
use crate::runner::{AnalysisRunner, Outcome};
use crate::upload;

/// What a change check compares between polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

/// Re-analyzes one file whenever its modification time or size changes.
pub struct Follower {
    path: PathBuf,
    config: Arc<IntakeConfig>,
    runner: Arc<AnalysisRunner>,
}

impl Follower {
    pub fn new(path: PathBuf, config: Arc<IntakeConfig>) -> Self {
        let runner = Arc::new(AnalysisRunner::new(config.analysis.clone()));
        Self { path, config, runner }
    }

    /// Poll until `shutdown` fires, sending every completed analysis to `results`.
    pub async fn run(self, shutdown: CancellationToken, results: mpsc::UnboundedSender<Analyzed>) {
        let poll = Duration::from_millis(self.config.follow.poll_interval_ms);
        info!(file = %self.path.display(), "Following file (poll interval: {:?})", poll);

        let mut interval = time::interval(poll);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut last_seen: Option<Fingerprint> = None;

        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    info!("Follow stopped");
                    self.runner.cancel();
                    break;
                }
                _ = interval.tick() => {}
            }

            let current = match tokio::fs::metadata(&self.path).await {
                Ok(meta) => Fingerprint {
                    modified: meta.modified().ok(),
                    len: meta.len(),
                },
                Err(e) => {
                    debug!(file = %self.path.display(), "Follow: cannot stat file: {}", e);
                    continue;
                }
            };
            if last_seen == Some(current) {
                continue;
            }
            last_seen = Some(current);

            let upload = match upload::load(&self.path, &self.config.upload).await {
                Ok(upload) => upload,
                Err(e) => {
                    error!("{}", e);
                    continue;
                }
            };

            let job = self.runner.submit(upload);
            let results = results.clone();
            tokio::spawn(async move {
                let id = job.id;
                match job.outcome().await {
                    Ok(Outcome::Completed(analyzed)) => {
                        let _ = results.send(*analyzed);
                    }
                    Ok(Outcome::Superseded) => debug!(job = id, "Follow: result discarded"),
                    Err(e) => warn!(job = id, "Follow: analysis failed: {}", e),
                }
            });
        }
    }
}
