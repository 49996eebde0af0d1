//! Filesystem operation kinds.

use std::fmt;

use bitflags::bitflags;
use notify::event::{EventKind, ModifyKind, RenameMode};
use serde::{Serialize, Serializer};

bitflags! {
    /// Kind of change observed on a path.
    ///
    /// A single delivered event may carry more than one kind when the
    /// backend coalesces flags, so this is a set rather than a plain enum.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Op: u8 {
        const CREATE = 1 << 0;
        const WRITE = 1 << 1;
        const REMOVE = 1 << 2;
        const RENAME = 1 << 3;
        const CHMOD = 1 << 4;
    }
}

impl Op {
    /// Map a notify event kind onto the operation set.
    ///
    /// Returns `None` for kinds that are not recorded (access, unknown, and
    /// the paired rename notification whose halves were already reported).
    #[must_use]
    pub const fn from_event_kind(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::CREATE),
            EventKind::Remove(_) => Some(Self::REMOVE),
            EventKind::Modify(modify) => match modify {
                ModifyKind::Metadata(_) => Some(Self::CHMOD),
                // The destination of a move shows up as a new entry.
                ModifyKind::Name(RenameMode::To) => Some(Self::CREATE),
                ModifyKind::Name(RenameMode::Both) => None,
                ModifyKind::Name(_) => Some(Self::RENAME),
                ModifyKind::Data(_) | ModifyKind::Any | ModifyKind::Other => Some(Self::WRITE),
            },
            EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, _)) in self.iter_names().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

impl Serialize for Op {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, RemoveKind};

    #[test]
    fn test_display_single() {
        assert_eq!(Op::WRITE.to_string(), "WRITE");
        assert_eq!(Op::CHMOD.to_string(), "CHMOD");
    }

    #[test]
    fn test_display_composite() {
        assert_eq!((Op::CREATE | Op::WRITE).to_string(), "CREATE|WRITE");
        assert_eq!((Op::REMOVE | Op::RENAME).to_string(), "REMOVE|RENAME");
    }

    #[test]
    fn test_display_empty() {
        assert_eq!(Op::empty().to_string(), "");
    }

    #[test]
    fn test_serialize_as_string() {
        let json = serde_json::to_string(&vec![Op::WRITE, Op::CREATE | Op::CHMOD]).unwrap();
        assert_eq!(json, r#"["WRITE","CREATE|CHMOD"]"#);
    }

    #[test]
    fn test_from_event_kind_basic() {
        assert_eq!(
            Op::from_event_kind(&EventKind::Create(CreateKind::File)),
            Some(Op::CREATE)
        );
        assert_eq!(
            Op::from_event_kind(&EventKind::Remove(RemoveKind::Folder)),
            Some(Op::REMOVE)
        );
        assert_eq!(
            Op::from_event_kind(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            Some(Op::WRITE)
        );
        assert_eq!(
            Op::from_event_kind(&EventKind::Modify(ModifyKind::Metadata(
                MetadataKind::Permissions
            ))),
            Some(Op::CHMOD)
        );
    }

    #[test]
    fn test_from_event_kind_renames() {
        assert_eq!(
            Op::from_event_kind(&EventKind::Modify(ModifyKind::Name(RenameMode::From))),
            Some(Op::RENAME)
        );
        assert_eq!(
            Op::from_event_kind(&EventKind::Modify(ModifyKind::Name(RenameMode::To))),
            Some(Op::CREATE)
        );
        assert_eq!(
            Op::from_event_kind(&EventKind::Modify(ModifyKind::Name(RenameMode::Both))),
            None
        );
    }

    #[test]
    fn test_from_event_kind_ignored() {
        assert_eq!(
            Op::from_event_kind(&EventKind::Access(AccessKind::Any)),
            None
        );
        assert_eq!(Op::from_event_kind(&EventKind::Any), None);
        assert_eq!(Op::from_event_kind(&EventKind::Other), None);
    }
}
