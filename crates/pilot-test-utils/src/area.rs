//! [`TestArea`] builder for working-area test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary git work tree carrying the pilot project marker.
///
/// The root is canonicalized so it compares equal to what the working
/// area resolver reports.
///
/// # Example
///
/// ```rust,no_run
/// use pilot_test_utils::area::TestArea;
///
/// let area = TestArea::new();
/// area.mkdir("data/train");
/// area.assert_file_exists(".pilot/project.toml");
/// ```
pub struct TestArea {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl Default for TestArea {
    fn default() -> Self {
        Self::new()
    }
}

impl TestArea {
    /// Project name written into the marker.
    pub const PROJECT_NAME: &'static str = "pilot-test";

    /// Create a git work tree with a valid project marker.
    pub fn new() -> Self {
        let area = Self::without_marker();
        area.write_file(
            ".pilot/project.toml",
            &format!("name = \"{}\"\n", Self::PROJECT_NAME),
        );
        area
    }

    /// Create a git work tree that lacks the project marker.
    pub fn without_marker() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = dunce::canonicalize(temp_dir.path()).unwrap();
        git2::Repository::init(&root).unwrap_or_else(|e| {
            panic!(
                "TestArea: failed to init repository at {}: {e}",
                root.display()
            )
        });
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Return the canonical root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory under the root where tests place run output areas.
    pub fn runs_dir(&self) -> PathBuf {
        self.root.join("runs")
    }

    /// Create a directory (and parents) relative to the root.
    pub fn mkdir(&self, path: &str) -> PathBuf {
        let full = self.root.join(path);
        fs::create_dir_all(&full)
            .unwrap_or_else(|e| panic!("TestArea: failed to create {}: {e}", full.display()));
        full
    }

    /// Write a file relative to the root, creating parents.
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full, content)
            .unwrap_or_else(|e| panic!("TestArea: failed to write {}: {e}", full.display()));
        full
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root.join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
