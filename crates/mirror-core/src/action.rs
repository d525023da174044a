//! Actions derived by a reconciliation pass

use std::fmt;

use mirror_fs::RelativePath;

/// What a pass did (or, in a dry run, would do) to one replica entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// A file was copied into the replica where none existed
    Create,
    /// A replica file was replaced with the differing source content
    Update,
    /// A replica file absent from the source was removed
    DeleteFile,
    /// A replica directory absent from the source was removed with its contents
    DeleteDir,
}

impl ActionKind {
    /// Verb phrase used in the observer message.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create => "copied to backup directory as a new file",
            Self::Update => "updated",
            Self::DeleteFile | Self::DeleteDir => "has been purged",
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Self::DeleteFile | Self::DeleteDir)
    }
}

/// An action on the entry at `path`, relative to the replica root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action {
    pub kind: ActionKind,
    pub path: RelativePath,
}

impl Action {
    pub fn new(kind: ActionKind, path: RelativePath) -> Self {
        Self { kind, path }
    }

    pub fn create(path: RelativePath) -> Self {
        Self::new(ActionKind::Create, path)
    }

    pub fn update(path: RelativePath) -> Self {
        Self::new(ActionKind::Update, path)
    }

    pub fn delete_file(path: RelativePath) -> Self {
        Self::new(ActionKind::DeleteFile, path)
    }

    pub fn delete_dir(path: RelativePath) -> Self {
        Self::new(ActionKind::DeleteDir, path)
    }
}

/// Renders `"<relativePath> <verb>."`.
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}.", self.path, self.kind.verb())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_observer_format() {
        assert_eq!(
            Action::create("a/b.txt".into()).to_string(),
            "a/b.txt copied to backup directory as a new file."
        );
        assert_eq!(Action::update("c.txt".into()).to_string(), "c.txt updated.");
        assert_eq!(
            Action::delete_file("x.log".into()).to_string(),
            "x.log has been purged."
        );
        assert_eq!(
            Action::delete_dir("old".into()).to_string(),
            "old has been purged."
        );
    }

    #[test]
    fn delete_kinds() {
        assert!(ActionKind::DeleteFile.is_delete());
        assert!(ActionKind::DeleteDir.is_delete());
        assert!(!ActionKind::Create.is_delete());
        assert!(!ActionKind::Update.is_delete());
    }
}
