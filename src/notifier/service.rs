//! Watch service abstraction and the notify-backed implementation.
//!
//! A watch service registers per-path watches and delivers what it sees on
//! two streams: events and errors. Releasing the service closes both.
//!
//! The streams are bounded. A full stream makes the backend thread wait for
//! the collector; once the receiving side is dropped, sends fail and the
//! backend discards what it sees.

use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::op::Op;
use crate::error::WatcherError;
use crate::Result;

/// A single change reported by a watch service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    /// Path the change was reported for, as delivered.
    pub path: PathBuf,
    /// Kinds of change carried by this event.
    pub op: Op,
}

impl WatchEvent {
    /// Create a new event.
    pub fn new(path: impl Into<PathBuf>, op: Op) -> Self {
        Self {
            path: path.into(),
            op,
        }
    }
}

/// Events a watch service may buffer before its backend thread blocks.
pub const WATCH_CHANNEL_CAPACITY: usize = 1024;

/// Receiving half of a watch service's output.
#[derive(Debug)]
pub struct WatchStreams {
    /// Change events.
    pub events: mpsc::Receiver<WatchEvent>,
    /// Non-fatal errors from the backend.
    pub errors: mpsc::Receiver<WatcherError>,
}

/// Sending half of a watch service's output.
///
/// Both streams close once every clone of the sink has been dropped.
#[derive(Debug, Clone)]
pub struct WatchSink {
    events: mpsc::Sender<WatchEvent>,
    errors: mpsc::Sender<WatcherError>,
}

impl WatchSink {
    /// Deliver an event, waiting for room while the streams are full.
    ///
    /// Meant for backend threads; must not be called from async code.
    /// Returns `false` once the receiver is gone.
    pub fn send_event(&self, event: WatchEvent) -> bool {
        self.events.blocking_send(event).is_ok()
    }

    /// Deliver an error, waiting for room while the streams are full.
    ///
    /// Returns `false` once the receiver is gone.
    pub fn send_error(&self, error: WatcherError) -> bool {
        self.errors.blocking_send(error).is_ok()
    }

    /// Deliver an event without waiting. Returns `false` if the stream is
    /// full or the receiver is gone.
    pub fn try_send_event(&self, event: WatchEvent) -> bool {
        self.events.try_send(event).is_ok()
    }

    /// Deliver an error without waiting. Returns `false` if the stream is
    /// full or the receiver is gone.
    pub fn try_send_error(&self, error: WatcherError) -> bool {
        self.errors.try_send(error).is_ok()
    }
}

/// Create a connected sink/streams pair holding up to
/// [`WATCH_CHANNEL_CAPACITY`] items per stream.
#[must_use]
pub fn watch_channel() -> (WatchSink, WatchStreams) {
    let (events_tx, events) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
    let (errors_tx, errors) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
    (
        WatchSink {
            events: events_tx,
            errors: errors_tx,
        },
        WatchStreams { events, errors },
    )
}

/// Capability to subscribe to changes on individual paths.
pub trait WatchService: Send + 'static {
    /// Start watching a single path (non-recursively).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the watch.
    fn add_watch(&mut self, path: &Path) -> Result<()>;

    /// Release the service. Its streams close afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to shut down cleanly.
    fn close(&mut self) -> Result<()>;
}

/// Watch service backed by the platform's recommended notify watcher.
pub struct NotifyWatchService {
    watcher: Option<RecommendedWatcher>,
}

impl NotifyWatchService {
    /// Create the watcher and the streams it feeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS notification service cannot be created.
    pub fn new() -> Result<(Self, WatchStreams)> {
        let (sink, streams) = watch_channel();

        let watcher = notify::recommended_watcher(
            move |result: std::result::Result<notify::Event, notify::Error>| match result {
                Ok(event) => forward_event(&sink, event),
                Err(e) => {
                    sink.send_error(WatcherError::Stream(e.to_string()));
                }
            },
        )
        .map_err(|e| WatcherError::ServiceInit(e.to_string()))?;

        Ok((
            Self {
                watcher: Some(watcher),
            },
            streams,
        ))
    }
}

impl WatchService for NotifyWatchService {
    fn add_watch(&mut self, path: &Path) -> Result<()> {
        let watcher = self.watcher.as_mut().ok_or(WatcherError::Closed)?;
        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| WatcherError::watch_failed(path, e))?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        // Dropping the watcher stops the backend thread, which drops the sink.
        drop(self.watcher.take().ok_or(WatcherError::Closed)?);
        Ok(())
    }
}

/// Translate one notify event into per-path watch events.
fn forward_event(sink: &WatchSink, event: notify::Event) {
    let Some(op) = Op::from_event_kind(&event.kind) else {
        return;
    };

    for path in event.paths {
        if !sink.send_event(WatchEvent { path, op }) {
            return;
        }
    }
}
