//! Directory-tree change notifier.
//!
//! This module provides:
//! - Initial watch installation across a tree (`installer`)
//! - A single event-collector loop that builds a per-path log (`collector`)
//! - The `Notifier` handle tying lifecycle and accessors together

mod collector;
mod installer;
mod log;
mod op;
mod path;
mod service;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

pub use installer::{WalkFailure, WalkPolicy, WalkReport};
pub use log::EventsLog;
pub use op::Op;
pub use path::normalize_path;
pub use service::{
    watch_channel, NotifyWatchService, WatchEvent, WatchService, WatchSink, WatchStreams,
    WATCH_CHANNEL_CAPACITY,
};

use installer::{install_tree, WatchSet};
use crate::Result;

/// Predicate naming paths that must never be watched.
pub type ExclusionFn = dyn Fn(&Path) -> bool + Send + Sync;

struct Shared<S> {
    root_dir: PathBuf,
    watches: Mutex<WatchSet<S>>,
    events_log: Mutex<EventsLog>,
    streams: Mutex<Option<WatchStreams>>,
    is_excluded: Arc<ExclusionFn>,
    walk_report: WalkReport,
}

/// Observes a directory tree and records what happens to each path.
///
/// Cloning yields another handle to the same notifier, so the collector
/// task, the closer and readers can each hold one.
pub struct Notifier<S: WatchService = NotifyWatchService> {
    shared: Arc<Shared<S>>,
}

impl<S: WatchService> Clone for Notifier<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Notifier<NotifyWatchService> {
    /// Create a notifier for `root_dir` using the platform watcher.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS notification service cannot be created.
    pub fn init<F>(root_dir: impl Into<PathBuf>, is_excluded: F) -> Result<Self>
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        Self::init_with_policy(root_dir, is_excluded, WalkPolicy::default())
    }

    /// Like [`Notifier::init`], with an explicit walk failure policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification service cannot be created, or
    /// on the first walk failure under [`WalkPolicy::AbortOnError`].
    pub fn init_with_policy<F>(
        root_dir: impl Into<PathBuf>,
        is_excluded: F,
        policy: WalkPolicy,
    ) -> Result<Self>
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        let (service, streams) = NotifyWatchService::new().map_err(|e| {
            tracing::error!(error = %e, "Failed to init notifier");
            e
        })?;
        Self::with_service(service, streams, root_dir, is_excluded, policy)
    }
}

impl<S: WatchService> Notifier<S> {
    /// Create a notifier over an already constructed watch service.
    ///
    /// Walks `root_dir` and installs watches before returning.
    ///
    /// # Errors
    ///
    /// Returns the first walk failure under [`WalkPolicy::AbortOnError`].
    pub fn with_service<F>(
        service: S,
        streams: WatchStreams,
        root_dir: impl Into<PathBuf>,
        is_excluded: F,
        policy: WalkPolicy,
    ) -> Result<Self>
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        let root_dir = root_dir.into();
        let is_excluded: Arc<ExclusionFn> = Arc::new(is_excluded);
        let mut watches = WatchSet::new(service);

        let walk_report = install_tree(&mut watches, &root_dir, is_excluded.as_ref(), policy)?;

        tracing::info!(
            root = %root_dir.display(),
            watches = watches.len(),
            excluded = walk_report.excluded,
            failures = walk_report.failures.len(),
            "Watches installed"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                root_dir,
                watches: Mutex::new(watches),
                events_log: Mutex::new(EventsLog::new()),
                streams: Mutex::new(Some(streams)),
                is_excluded,
                walk_report,
            }),
        })
    }

    /// Watch a single path.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the path or is closed.
    pub fn watch_file(&self, path: &Path) -> Result<()> {
        self.shared.watches.lock().watch_file(path)
    }

    /// Release the watch service.
    ///
    /// A running collector sees its streams close and returns. Streams not
    /// yet handed to a collector are dropped. Calling this again is a no-op.
    pub fn close(&self) {
        drop(self.shared.streams.lock().take());
        let service = self.shared.watches.lock().take_service();
        let Some(mut service) = service else {
            tracing::debug!(root = %self.shared.root_dir.display(), "Watch service already closed");
            return;
        };

        tracing::info!(root = %self.shared.root_dir.display(), "Closing watch service");
        if let Err(e) = service.close() {
            tracing::warn!(error = %e, "Failed to close watch service");
        }
    }

    /// Check whether [`Notifier::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.watches.lock().is_closed()
    }

    /// Snapshot of the events recorded so far.
    #[must_use]
    pub fn events_log(&self) -> EventsLog {
        self.shared.events_log.lock().clone()
    }

    /// Take the events recorded so far and start a fresh window.
    #[must_use]
    pub fn take_events_log(&self) -> EventsLog {
        std::mem::take(&mut *self.shared.events_log.lock())
    }

    /// Number of distinct paths ever successfully watched.
    #[must_use]
    pub fn watch_count(&self) -> usize {
        self.shared.watches.lock().len()
    }

    /// Paths ever successfully watched, in no particular order.
    ///
    /// A watch the backend drops on its own, such as for a deleted path,
    /// keeps its entry.
    #[must_use]
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        self.shared.watches.lock().paths()
    }

    /// Root of the observed tree.
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.shared.root_dir
    }

    /// Outcome of the initial walk.
    #[must_use]
    pub fn walk_report(&self) -> &WalkReport {
        &self.shared.walk_report
    }
}
