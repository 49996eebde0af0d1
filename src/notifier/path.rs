//! Path normalization for reported event paths.
//!
//! Events for a watched root can come back with a doubled leading separator
//! (`//tmp/a` instead of `/tmp/a`). Only that exact prefix is collapsed.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Collapse a leading `//` into `/`.
///
/// Paths starting with three or more separators, and doubled separators
/// anywhere but the start, are returned unchanged.
#[must_use]
pub fn normalize_path(path: &Path) -> Cow<'_, Path> {
    strip_doubled_root(path).map_or(Cow::Borrowed(path), Cow::Owned)
}

#[cfg(unix)]
fn strip_doubled_root(path: &Path) -> Option<PathBuf> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let bytes = path.as_os_str().as_bytes();
    has_doubled_root(bytes).then(|| PathBuf::from(OsStr::from_bytes(&bytes[1..])))
}

#[cfg(not(unix))]
fn strip_doubled_root(path: &Path) -> Option<PathBuf> {
    let s = path.to_str()?;
    has_doubled_root(s.as_bytes()).then(|| PathBuf::from(&s[1..]))
}

fn has_doubled_root(bytes: &[u8]) -> bool {
    matches!(bytes, [b'/', b'/', rest @ ..] if rest.first() != Some(&b'/'))
}
