//! Configuration settings and validation.

use std::path::PathBuf;
use std::time::Duration;

use crate::exclusion::ExclusionFilter;
use crate::notifier::WalkPolicy;
use crate::{Error, Result};

/// Main configuration for a treenotify run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the tree to observe.
    pub root_dir: PathBuf,

    /// Gitignore-style patterns, relative to `root_dir`, never to be watched.
    pub exclude: Vec<String>,

    /// Behavior when the initial walk hits an unwatchable path.
    pub walk_policy: WalkPolicy,

    /// Length of the observation window; `None` waits for Ctrl+C.
    pub duration: Option<Duration>,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON.
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            exclude: Vec::new(),
            walk_policy: WalkPolicy::default(),
            duration: None,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl Config {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.root_dir.is_dir() {
            return Err(Error::config(format!(
                "root directory '{}' does not exist or is not a directory",
                self.root_dir.display()
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "invalid log level '{}', must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }

        if self.duration.is_some_and(|d| d.is_zero()) {
            return Err(Error::config("duration cannot be 0"));
        }

        if self.exclude.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::config("exclude patterns cannot be empty"));
        }

        Ok(())
    }

    /// Absolute, symlink-free form of `root_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be resolved.
    pub fn resolved_root(&self) -> Result<PathBuf> {
        Ok(std::fs::canonicalize(&self.root_dir)?)
    }

    /// Build the exclusion filter described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be resolved or a pattern is invalid.
    pub fn exclusion_filter(&self) -> Result<ExclusionFilter> {
        let root = self.resolved_root()?;
        let patterns: Vec<&str> = self.exclude.iter().map(String::as_str).collect();
        ExclusionFilter::with_patterns(root, &patterns)
    }
}
