mod cli;
mod config;
mod error;
mod follow;
mod report;
mod runner;
mod upload;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    cli::Cli,
    config::{IntakeConfig, LogFormat, LogOutput},
    error::IntakeResult,
    follow::Follower,
    report::{Analyzed, ReportView},
    runner::{AnalysisRunner, Outcome},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Phase 1: thread-local subscriber for config loading, replaced below
    let basic_tracing = init_tracing_basic();

    info!("Starting logscope v{}", env!("CARGO_PKG_VERSION"));

    let mut config = IntakeConfig::load().context("Failed to load configuration")?;
    if let Some(limit) = cli.top_errors {
        config.analysis.top_error_limit = limit;
    }
    config.validate().context("Configuration validation failed")?;

    // Phase 2: global subscriber from config
    drop(basic_tracing);
    init_tracing_from_config(&config)?;

    let view = cli.view().context("Invalid entry options")?;
    let config = Arc::new(config);

    if cli.follow {
        let [path] = cli.files.as_slice() else {
            anyhow::bail!("--follow takes exactly one file, got {}", cli.files.len());
        };
        return follow(path.clone(), config, view).await;
    }

    analyze_files(cli.files, config, &view).await
}

/// Analyze every file concurrently; print results in argument order.
async fn analyze_files(files: Vec<PathBuf>, config: Arc<IntakeConfig>, view: &ReportView) -> Result<()> {
    let total = files.len();
    let mut jobs = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let config = config.clone();
        jobs.spawn(async move { (index, analyze_file(&path, &config).await) });
    }

    let mut results: Vec<Option<IntakeResult<Analyzed>>> = (0..total).map(|_| None).collect();
    while let Some(joined) = jobs.join_next().await {
        let (index, result) = joined.context("Analysis task panicked")?;
        results[index] = Some(result);
    }

    let mut failed = 0usize;
    for result in results.into_iter().flatten() {
        match result.and_then(|analyzed| view.render(&analyzed)) {
            Ok(lines) => lines.iter().for_each(|line| println!("{}", line)),
            Err(e) => {
                failed += 1;
                error!("{}", e);
            }
        }
    }

    info!("Analyzed {} of {} files", total - failed, total);
    if failed > 0 {
        anyhow::bail!("{} of {} files could not be analyzed", failed, total);
    }
    Ok(())
}

async fn analyze_file(path: &std::path::Path, config: &IntakeConfig) -> IntakeResult<Analyzed> {
    let upload = upload::load(path, &config.upload).await?;
    let runner = AnalysisRunner::new(config.analysis.clone());
    match runner.submit(upload).outcome().await? {
        Outcome::Completed(analyzed) => Ok(*analyzed),
        // nothing else submits to this runner
        Outcome::Superseded => Err(engine::EngineError::Cancelled(0).into()),
    }
}

async fn follow(path: PathBuf, config: Arc<IntakeConfig>, view: ReportView) -> Result<()> {
    let shutdown = CancellationToken::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<Analyzed>();

    let follower = tokio::spawn(Follower::new(path, config).run(shutdown.clone(), tx));

    let printer = tokio::spawn(async move {
        while let Some(analyzed) = rx.recv().await {
            match view.render(&analyzed) {
                Ok(lines) => lines.iter().for_each(|line| println!("{}", line)),
                Err(e) => error!("{}", e),
            }
        }
    });

    shutdown_signal().await;
    shutdown.cancel();

    follower.await.context("Follow task panicked")?;
    printer.await.context("Output task panicked")?;
    Ok(())
}

/// Phase 1: basic stderr tracing while configuration loads.
fn init_tracing_basic() -> tracing::subscriber::DefaultGuard {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,logscope=debug"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_default(subscriber)
}

/// Phase 2: global subscriber honoring `logging.*`, with `RUST_LOG` taking precedence.
fn init_tracing_from_config(config: &IntakeConfig) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let open = |path: &str| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map(Arc::new)
            .with_context(|| format!("Failed to open log file '{}'", path))
    };

    match (&config.logging.format, &config.logging.output) {
        (LogFormat::Json, LogOutput::Stderr) => {
            let layer = fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        (LogFormat::Json, LogOutput::File { path }) => {
            let layer = fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .with_writer(open(path)?);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        (LogFormat::Pretty, LogOutput::Stderr) => {
            let layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        (LogFormat::Pretty, LogOutput::File { path }) => {
            let layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(false)
                .with_writer(open(path)?);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, stopping...");
        },
        _ = terminate => {
            warn!("Received SIGTERM, stopping...");
        },
    }
}
