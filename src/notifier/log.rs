//! Per-path, arrival-ordered history of observed operations.

#![allow(clippy::missing_const_for_fn)]

use std::collections::{hash_map, HashMap};
use std::path::{Path, PathBuf};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::op::Op;

/// Mapping from normalized path to the operations seen on it, in the order
/// they were consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventsLog {
    entries: HashMap<PathBuf, Vec<Op>>,
}

impl EventsLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `op` to the sequence for `path`.
    pub fn record(&mut self, path: &Path, op: Op) {
        if let Some(ops) = self.entries.get_mut(path) {
            ops.push(op);
        } else {
            self.entries.insert(path.to_path_buf(), vec![op]);
        }
    }

    /// Operations recorded for `path`.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&[Op]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    /// Check whether anything was recorded for `path`.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Most recent operation recorded for `path`.
    #[must_use]
    pub fn last_op(&self, path: &Path) -> Option<Op> {
        self.entries.get(path).and_then(|ops| ops.last().copied())
    }

    /// Number of distinct paths in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of recorded operations across all paths.
    #[must_use]
    pub fn total_ops(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Iterate over paths and their operations, in no particular order.
    pub fn iter(&self) -> hash_map::Iter<'_, PathBuf, Vec<Op>> {
        self.entries.iter()
    }

    /// Paths present in the log, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = self.entries.keys().map(PathBuf::as_path).collect();
        paths.sort_unstable();
        paths
    }

    /// Consume the log into its underlying map.
    #[must_use]
    pub fn into_inner(self) -> HashMap<PathBuf, Vec<Op>> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a EventsLog {
    type Item = (&'a PathBuf, &'a Vec<Op>);
    type IntoIter = hash_map::Iter<'a, PathBuf, Vec<Op>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for EventsLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Sorted keys keep the output stable; non-UTF-8 names are rendered
        // with replacement characters instead of failing the whole log.
        let mut sorted: Vec<(&PathBuf, &Vec<Op>)> = self.entries.iter().collect();
        sorted.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for (path, ops) in sorted {
            map.serialize_entry(&path.to_string_lossy(), ops)?;
        }
        map.end()
    }
}
