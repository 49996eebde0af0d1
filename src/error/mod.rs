//! Error types and Result aliases for treenotify.
//!
//! This module defines the error hierarchy used throughout the crate.
//! All public functions return `Result<T, Error>` or `Result<T>`.

use thiserror::Error;

/// Result type alias using treenotify's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for treenotify operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// File watching error.
    #[error("watcher error: {0}")]
    Watcher(#[from] WatcherError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// File watcher errors.
#[derive(Error, Debug)]
pub enum WatcherError {
    /// The underlying notification service could not be created.
    #[error("failed to initialize watch service: {0}")]
    ServiceInit(String),

    /// Failed to watch path.
    #[error("failed to watch path '{path}': {reason}")]
    WatchFailed { path: String, reason: String },

    /// Directory traversal failed at a path.
    #[error("failed to walk path '{path}': {reason}")]
    Walk { path: String, reason: String },

    /// Error reported on the watch service's error stream.
    #[error("watch stream error: {0}")]
    Stream(String),

    /// Releasing the watch service failed.
    #[error("failed to close watch service: {0}")]
    Close(String),

    /// The watch service has already been released.
    #[error("watch service is closed")]
    Closed,
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl WatcherError {
    /// Create a watch failure for `path`.
    pub fn watch_failed(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::WatchFailed {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests;
