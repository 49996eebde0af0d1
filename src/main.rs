//! treenotify - record filesystem changes under a directory tree
//!
//! Watches a tree for one observation window and prints the events log as
//! JSON on stdout.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use treenotify::observability::init_tracing;
use treenotify::{Config, Error, Notifier, Result, WalkPolicy};

/// treenotify - record filesystem changes under a directory tree
#[derive(Parser, Debug)]
#[command(name = "treenotify")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root of the tree to observe
    #[arg(env = "TREENOTIFY_ROOT", default_value = ".")]
    root: PathBuf,

    /// Gitignore-style patterns to exclude from watching
    #[arg(short, long, env = "TREENOTIFY_EXCLUDE", value_delimiter = ',')]
    exclude: Vec<String>,

    /// Observation window in seconds (default: until Ctrl+C)
    #[arg(short, long, env = "TREENOTIFY_DURATION")]
    duration: Option<u64>,

    /// Fail on the first path that cannot be watched during the initial walk
    #[arg(long, env = "TREENOTIFY_ABORT_ON_ERROR")]
    abort_on_error: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TREENOTIFY_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, env = "TREENOTIFY_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.log_json);

    let config = Config {
        root_dir: cli.root,
        exclude: cli.exclude,
        walk_policy: if cli.abort_on_error {
            WalkPolicy::AbortOnError
        } else {
            WalkPolicy::ContinueOnError
        },
        duration: cli.duration.map(Duration::from_secs),
        log_level: cli.log_level,
        log_json: cli.log_json,
    };

    tracing::debug!(?config, "Configuration loaded");
    config.validate()?;

    let root = config.resolved_root()?;
    let filter = config.exclusion_filter()?;
    let notifier = Notifier::init_with_policy(&root, filter.into_predicate(), config.walk_policy)?;

    for failure in &notifier.walk_report().failures {
        tracing::warn!(path = %failure.path.display(), reason = %failure.reason, "Path not watched");
    }

    let cancel = CancellationToken::new();
    let collector = {
        let notifier = notifier.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { notifier.start(cancel).await })
    };

    observation_window(config.duration).await;

    cancel.cancel();
    collector
        .await
        .map_err(|e| Error::internal(format!("event collector task failed: {e}")))?;
    notifier.close();

    let log = notifier.events_log();
    tracing::info!(
        paths = log.len(),
        ops = log.total_ops(),
        "Observation window closed"
    );

    let json = serde_json::to_string_pretty(&log)
        .map_err(|e| Error::internal(format!("failed to serialize events log: {e}")))?;
    println!("{json}");

    Ok(())
}

/// Wait until the window elapses or a shutdown signal arrives.
async fn observation_window(duration: Option<Duration>) {
    let elapsed = async {
        match duration {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending::<()>().await,
        }
    };

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = elapsed => {
            tracing::info!("Observation window elapsed");
        }
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, stopping");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, stopping");
        }
    }
}
