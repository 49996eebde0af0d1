//! treenotify
//!
//! Watches a directory tree and keeps a per-path, arrival-ordered log of the
//! filesystem operations seen during an observation window, so snapshot and
//! diff tooling can skip a full re-scan.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod exclusion;
pub mod notifier;
pub mod observability;

pub use config::Config;
pub use error::{Error, Result, WatcherError};
pub use exclusion::ExclusionFilter;
pub use notifier::{EventsLog, Notifier, Op, WalkPolicy, WalkReport, WatchEvent};
