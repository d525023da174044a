//! Relative path keys shared by the source and replica trees

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A path relative to a tree root, used as the identity key of an entry.
///
/// Only normal components are kept: roots, prefixes and `.` are dropped and
/// `..` pops the previous component, so a key can never escape its root.
/// Displayed with forward slashes on every platform; converted to a native
/// path only when resolved against a root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath {
    inner: PathBuf,
}

impl RelativePath {
    /// Create a new RelativePath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let mut inner = PathBuf::new();
        for component in path.as_ref().components() {
            match component {
                Component::Normal(name) => inner.push(name),
                Component::ParentDir => {
                    inner.pop();
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        Self { inner }
    }

    /// Strip `root` from `path`, returning `None` if `path` is not under it.
    pub fn from_root(root: &Path, path: &Path) -> Option<Self> {
        path.strip_prefix(root).ok().map(Self::new)
    }

    /// The key of the tree root itself.
    pub fn is_root(&self) -> bool {
        self.inner.as_os_str().is_empty()
    }

    /// Borrow as a platform-native relative path.
    pub fn as_path(&self) -> &Path {
        &self.inner
    }

    /// Resolve this key against a tree root.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.inner)
    }

    /// Join this path with a single segment.
    pub fn join(&self, segment: impl AsRef<Path>) -> Self {
        Self::new(self.inner.join(segment))
    }

    /// Get the parent key; `None` for top-level entries and for the root.
    pub fn parent(&self) -> Option<Self> {
        let parent = self.inner.parent()?;
        if parent.as_os_str().is_empty() {
            None
        } else {
            Some(Self {
                inner: parent.to_path_buf(),
            })
        }
    }

    /// Iterate over the strict ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = RelativePath> + '_ {
        std::iter::successors(self.parent(), RelativePath::parent)
    }

    /// Get the last component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.file_name().and_then(|n| n.to_str())
    }

    /// Number of components.
    pub fn depth(&self) -> usize {
        self.inner.components().count()
    }

    /// Component-wise prefix test; `a/bc` does not start with `a/b`.
    pub fn starts_with(&self, other: &RelativePath) -> bool {
        self.inner.starts_with(&other.inner)
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.inner
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.inner.components().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", component.as_os_str().to_string_lossy())?;
        }
        Ok(())
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RelativePath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for RelativePath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for RelativePath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
