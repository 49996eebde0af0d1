//! Watch installation across a directory tree.
//!
//! Walks the tree once at startup and registers a watch for every path the
//! exclusion predicate lets through. The same `watch_file` entry point is
//! used later when new directories appear.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::service::WatchService;
use super::ExclusionFn;
use crate::error::WatcherError;
use crate::Result;

/// What to do when the initial walk hits a failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalkPolicy {
    /// Record the failure and keep walking.
    #[default]
    ContinueOnError,
    /// Stop at the first failure and return it from init.
    AbortOnError,
}

/// A path the initial walk could not watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of the initial walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    /// Watches installed.
    pub watched: usize,
    /// Paths skipped by the exclusion predicate.
    pub excluded: usize,
    /// Paths that could not be read or watched.
    pub failures: Vec<WalkFailure>,
}

impl WalkReport {
    /// True when every visited path was either watched or excluded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The watch service together with the set of paths it is watching.
pub(crate) struct WatchSet<S> {
    service: Option<S>,
    paths: HashSet<PathBuf>,
}

impl<S: WatchService> WatchSet<S> {
    pub(crate) fn new(service: S) -> Self {
        Self {
            service: Some(service),
            paths: HashSet::new(),
        }
    }

    /// Number of distinct paths with a successful watch.
    pub(crate) fn len(&self) -> usize {
        self.paths.len()
    }

    pub(crate) fn paths(&self) -> Vec<PathBuf> {
        self.paths.iter().cloned().collect()
    }

    pub(crate) fn take_service(&mut self) -> Option<S> {
        self.service.take()
    }

    pub(crate) const fn is_closed(&self) -> bool {
        self.service.is_none()
    }

    /// Register a watch for a single path.
    ///
    /// Failures are logged here; callers decide whether they matter.
    pub(crate) fn watch_file(&mut self, path: &Path) -> Result<()> {
        let Some(service) = self.service.as_mut() else {
            tracing::error!(path = %path.display(), "Failed to add watch: service closed");
            return Err(WatcherError::Closed.into());
        };

        if let Err(e) = service.add_watch(path) {
            tracing::error!(path = %path.display(), error = %e, "Failed to add watch");
            return Err(e);
        }

        // Re-watching a recreated path does not change the count.
        self.paths.insert(path.to_path_buf());
        Ok(())
    }
}

/// Walk `root` and watch every non-excluded entry, the root included.
///
/// # Errors
///
/// Under [`WalkPolicy::AbortOnError`], returns the first read or watch
/// failure. Under [`WalkPolicy::ContinueOnError`] failures are collected in
/// the returned report instead.
pub(crate) fn install_tree<S: WatchService>(
    watches: &mut WatchSet<S>,
    root: &Path,
    is_excluded: &ExclusionFn,
    policy: WalkPolicy,
) -> Result<WalkReport> {
    let mut report = WalkReport::default();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                tracing::warn!(path = %path.display(), error = %e, "Error walking directory");
                if policy == WalkPolicy::AbortOnError {
                    return Err(WatcherError::Walk {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    }
                    .into());
                }
                report.failures.push(WalkFailure {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let path = entry.path();
        if is_excluded(path) {
            tracing::trace!(path = %path.display(), "Not adding watch for excluded path");
            report.excluded += 1;
            continue;
        }

        match watches.watch_file(path) {
            Ok(()) => report.watched += 1,
            Err(e) if policy == WalkPolicy::AbortOnError => return Err(e),
            Err(e) => report.failures.push(WalkFailure {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::service::fake::FakeWatchService;
    use crate::notifier::service::watch_channel;
    use std::fs;
    use tempfile::TempDir;

    fn sample_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src/nested")).unwrap();
        fs::create_dir(tmp.path().join("cache")).unwrap();
        fs::write(tmp.path().join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(tmp.path().join("src/nested/mod.rs"), "").unwrap();
        fs::write(tmp.path().join("cache/blob"), "x").unwrap();
        tmp
    }

    fn never(_: &Path) -> bool {
        false
    }

    #[test]
    fn test_watches_every_entry() {
        let tmp = sample_tree();
        let (sink, _streams) = watch_channel();
        let service = FakeWatchService::new(sink);
        let added = service.added.clone();
        let mut watches = WatchSet::new(service);

        let report =
            install_tree(&mut watches, tmp.path(), &never, WalkPolicy::default()).unwrap();

        // root, src, src/nested, cache, main.rs, mod.rs, blob
        assert_eq!(report.watched, 7);
        assert_eq!(watches.len(), 7);
        assert!(report.is_clean());
        assert!(added.lock().iter().any(|p| p == tmp.path()));
    }

    #[test]
    fn test_excluded_paths_not_counted() {
        let tmp = sample_tree();
        let cache = tmp.path().join("cache");
        let (sink, _streams) = watch_channel();
        let mut watches = WatchSet::new(FakeWatchService::new(sink));

        let is_excluded = move |p: &Path| p.starts_with(&cache);
        let report =
            install_tree(&mut watches, tmp.path(), &is_excluded, WalkPolicy::default()).unwrap();

        assert_eq!(report.excluded, 2);
        assert_eq!(report.watched, 5);
        assert_eq!(watches.len(), 5);
    }

    #[test]
    fn test_continue_on_error_collects_failures() {
        let tmp = sample_tree();
        let bad = tmp.path().join("src");
        let (sink, _streams) = watch_channel();
        let mut watches = WatchSet::new(FakeWatchService::new(sink).failing_on(&bad));

        let report = install_tree(
            &mut watches,
            tmp.path(),
            &never,
            WalkPolicy::ContinueOnError,
        )
        .unwrap();

        assert_eq!(report.watched, 6);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, bad);
        assert!(report.failures[0].reason.contains("injected failure"));
    }

    #[test]
    fn test_abort_on_error_stops_walk() {
        let tmp = sample_tree();
        let bad = tmp.path().join("src/main.rs");
        let (sink, _streams) = watch_channel();
        let mut watches = WatchSet::new(FakeWatchService::new(sink).failing_on(&bad));

        let err = install_tree(&mut watches, tmp.path(), &never, WalkPolicy::AbortOnError)
            .unwrap_err();

        assert!(err.to_string().contains("main.rs"));
        assert!(watches.len() < 7);
    }

    #[test]
    fn test_missing_root_reported() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("gone");
        let (sink, _streams) = watch_channel();
        let mut watches = WatchSet::new(FakeWatchService::new(sink));

        let report =
            install_tree(&mut watches, &missing, &never, WalkPolicy::ContinueOnError).unwrap();
        assert_eq!(report.watched, 0);
        assert_eq!(report.failures.len(), 1);

        let err = install_tree(&mut watches, &missing, &never, WalkPolicy::AbortOnError);
        assert!(err.is_err());
    }

    #[test]
    fn test_watch_file_after_close() {
        let (sink, _streams) = watch_channel();
        let mut watches = WatchSet::new(FakeWatchService::new(sink));
        assert!(watches.take_service().is_some());

        let err = watches.watch_file(Path::new("/tmp")).unwrap_err();
        assert!(matches!(err, crate::Error::Watcher(WatcherError::Closed)));
        assert_eq!(watches.len(), 0);
    }

    #[test]
    fn test_rewatch_counts_once() {
        let (sink, _streams) = watch_channel();
        let mut watches = WatchSet::new(FakeWatchService::new(sink));
        watches.watch_file(Path::new("/d")).unwrap();
        watches.watch_file(Path::new("/d")).unwrap();
        assert_eq!(watches.len(), 1);
        assert_eq!(watches.paths(), vec![PathBuf::from("/d")]);
    }
}
