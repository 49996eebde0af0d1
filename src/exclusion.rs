//! Path exclusion with gitignore-style patterns.
//!
//! Supplies a concrete exclusion predicate for the notifier: a set of
//! excluded path prefixes plus optional patterns rooted at the watched tree.

use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::Result;

/// Pseudo filesystems that never hold user data worth observing.
const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &["/proc", "/sys", "/dev"];

/// Decides which paths must never be watched.
#[derive(Debug)]
pub struct ExclusionFilter {
    prefixes: Vec<PathBuf>,
    patterns: Option<Gitignore>,
}

impl ExclusionFilter {
    /// Create a filter with only the default excluded prefixes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefixes: DEFAULT_EXCLUDED_PREFIXES.iter().map(PathBuf::from).collect(),
            patterns: None,
        }
    }

    /// Create a filter with custom ignore patterns rooted at `base_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if patterns are invalid.
    pub fn with_patterns(base_path: impl AsRef<Path>, patterns: &[&str]) -> Result<Self> {
        let mut filter = Self::new();
        if patterns.is_empty() {
            return Ok(filter);
        }

        let mut builder = GitignoreBuilder::new(base_path.as_ref());
        for pattern in patterns {
            builder
                .add_line(None, pattern)
                .map_err(|e| crate::Error::config(format!("invalid pattern: {e}")))?;
        }

        let gitignore = builder
            .build()
            .map_err(|e| crate::Error::config(format!("failed to build exclusion patterns: {e}")))?;

        filter.patterns = Some(gitignore);
        Ok(filter)
    }

    /// Exclude everything under `prefix` as well.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Check whether `path` must not be watched.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.prefixes.iter().any(|prefix| path.starts_with(prefix)) {
            return true;
        }

        let Some(ref gi) = self.patterns else {
            return false;
        };

        // Matching a path outside the pattern root panics inside `ignore`.
        match path.strip_prefix(gi.path()) {
            Ok(rel) if !rel.as_os_str().is_empty() => {}
            _ => return false,
        }

        gi.matched_path_or_any_parents(path, path.is_dir()).is_ignore()
    }

    /// Turn the filter into a predicate the notifier can own.
    pub fn into_predicate(self) -> impl Fn(&Path) -> bool + Send + Sync + 'static {
        move |path: &Path| self.is_excluded(path)
    }
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self::new()
    }
}
