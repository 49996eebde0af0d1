//! Event collector loop.
//!
//! Drains the watch streams on a single task, records each event in the log
//! and extends coverage to directories created while observing.

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::op::Op;
use super::path::normalize_path;
use super::service::{WatchEvent, WatchService};
use super::Notifier;

impl<S: WatchService> Notifier<S> {
    /// Run the collector until `cancel` fires or either stream closes.
    ///
    /// Cancellation ends the observation for good: the streams are dropped
    /// along with any pending events, and later changes are discarded by the
    /// backend. Only one collector can run per notifier; any further call
    /// returns immediately.
    pub async fn start(&self, cancel: CancellationToken) {
        let streams = self.shared.streams.lock().take();
        let Some(mut streams) = streams else {
            tracing::warn!(
                root = %self.root_dir().display(),
                "Event collector already running or stopped"
            );
            return;
        };

        tracing::debug!(root = %self.root_dir().display(), "Event collector started");

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("Cancellation received, stopping event collector");
                    return;
                }
                event = streams.events.recv() => {
                    let Some(event) = event else {
                        tracing::debug!("Event stream closed");
                        return;
                    };
                    self.handle_event(event).await;
                }
                error = streams.errors.recv() => {
                    let Some(error) = error else {
                        tracing::debug!("Error stream closed");
                        return;
                    };
                    tracing::error!(error = %error, "Watch service error");
                }
            }
        }
    }

    async fn handle_event(&self, event: WatchEvent) {
        let path = normalize_path(&event.path);
        self.shared.events_log.lock().record(&path, event.op);

        if event.op.contains(Op::CREATE) {
            self.watch_if_directory(&path).await;
        }
    }

    /// Subscribe to a newly created directory so its contents are observed.
    async fn watch_if_directory(&self, path: &Path) {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::trace!(
                    path = %path.display(),
                    error = %e,
                    "Cannot stat created path, skipping"
                );
                return;
            }
        };

        if !metadata.is_dir() {
            return;
        }

        // The predicate may touch the filesystem, so keep it off the runtime.
        let is_excluded = Arc::clone(&self.shared.is_excluded);
        let candidate = path.to_path_buf();
        match tokio::task::spawn_blocking(move || is_excluded(&candidate)).await {
            Ok(false) => {}
            Ok(true) => {
                tracing::trace!(path = %path.display(), "Not adding watch for excluded directory");
                return;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Exclusion check failed");
                return;
            }
        }

        tracing::trace!(path = %path.display(), "New directory created");
        // Failures are logged by watch_file; the directory is not retried.
        let _ = self.watch_file(path);
    }
}
