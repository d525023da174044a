//! [`TestTree`] builder for mirroring scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

/// Path to a named tree under the workspace `test-fixtures/trees` directory.
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/trees")
        .join(name)
}

/// A temporary directory holding `source/` and `replica/` side by side.
///
/// Both directories exist from the start. Every helper takes paths relative
/// to the tree it touches and panics with a descriptive message on failure.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.write_source("docs/a.txt", "hello");
/// tree.write_replica("stale.txt", "old");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("source")).unwrap();
        fs::create_dir(temp_dir.path().join("replica")).unwrap();
        Self { temp_dir }
    }

    /// Copy the `source/` and `replica/` directories of a fixture tree.
    pub fn from_fixture(name: &str) -> Self {
        let fixture = fixture_path(name);
        assert!(
            fixture.is_dir(),
            "Fixture tree not found: {}",
            fixture.display()
        );

        let tree = Self::new();
        copy_tree(&fixture.join("source"), &tree.source());
        copy_tree(&fixture.join("replica"), &tree.replica());
        tree
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.root().join("source")
    }

    pub fn replica(&self) -> PathBuf {
        self.root().join("replica")
    }

    pub fn write_source(&self, path: &str, content: impl AsRef<[u8]>) {
        write_file(&self.source().join(path), content.as_ref());
    }

    pub fn write_replica(&self, path: &str, content: impl AsRef<[u8]>) {
        write_file(&self.replica().join(path), content.as_ref());
    }

    pub fn mkdir_source(&self, path: &str) {
        fs::create_dir_all(self.source().join(path)).unwrap();
    }

    pub fn mkdir_replica(&self, path: &str) {
        fs::create_dir_all(self.replica().join(path)).unwrap();
    }

    pub fn read_replica(&self, path: &str) -> String {
        let full_path = self.replica().join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Assert the replica holds a regular file at `path` with `content`.
    pub fn assert_replica_file(&self, path: &str, content: &str) {
        let full_path = self.replica().join(path);
        assert!(
            full_path.is_file(),
            "Expected replica file: {}",
            full_path.display()
        );
        assert_eq!(
            self.read_replica(path),
            content,
            "Unexpected content in {}",
            full_path.display()
        );
    }

    pub fn assert_replica_dir(&self, path: &str) {
        let full_path = self.replica().join(path);
        assert!(
            full_path.is_dir(),
            "Expected replica directory: {}",
            full_path.display()
        );
    }

    /// Assert nothing exists at `path` in the replica.
    pub fn assert_replica_absent(&self, path: &str) {
        let full_path = self.replica().join(path);
        assert!(
            fs::symlink_metadata(&full_path).is_err(),
            "Expected replica entry NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert the replica has exactly the source's entries, kinds and bytes.
    pub fn assert_mirrors(&self) {
        let source = listing(&self.source());
        let replica = listing(&self.replica());
        assert!(
            source == replica,
            "Replica does not mirror source.\nSource:  {:?}\nReplica: {:?}",
            source.keys().collect::<Vec<_>>(),
            replica.keys().collect::<Vec<_>>()
        );
    }

    /// Relative paths of every entry in the replica, sorted, directories
    /// suffixed with `/`.
    pub fn replica_listing(&self) -> Vec<String> {
        listing(&self.replica()).into_keys().collect()
    }
}

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap_or_else(|e| panic!("Could not write {}: {}", path.display(), e));
}

/// Map of relative path to file content (`None` for directories).
fn listing(root: &Path) -> BTreeMap<String, Option<Vec<u8>>> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| entry.unwrap())
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            if entry.file_type().is_dir() {
                (format!("{}/", relative), None)
            } else {
                (relative, Some(fs::read(entry.path()).unwrap()))
            }
        })
        .collect()
}

fn copy_tree(from: &Path, to: &Path) {
    if !from.exists() {
        return;
    }
    for entry in WalkDir::new(from).min_depth(1) {
        let entry = entry.unwrap();
        let target = to.join(entry.path().strip_prefix(from).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).unwrap();
        } else {
            write_file(&target, &fs::read(entry.path()).unwrap());
        }
    }
}
