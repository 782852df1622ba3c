//! [`TestMonorepo`] builder for conformance test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// A temporary monorepo with helpers for laying out packages, skeletons and
/// configuration, and for asserting on the result.
///
/// # Example
///
/// ```rust,no_run
/// use conform_test_utils::TestMonorepo;
/// use serde_json::json;
///
/// let repo = TestMonorepo::new();
/// repo.add_package("packages", "add", &json!({"name": "@myrepo/add"}));
/// repo.write_file("tooling/skeleton/shared/tsconfig.json", "{}");
/// repo.assert_file_exists("packages/add/package.json");
/// ```
pub struct TestMonorepo {
    temp_dir: TempDir,
}

impl Default for TestMonorepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestMonorepo {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the repository.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Create `<category>/<slug>/package.json` holding `manifest`,
    /// pretty-printed with a trailing newline.
    pub fn add_package(&self, category: &str, slug: &str, manifest: &Value) -> PathBuf {
        let relative = format!("{category}/{slug}/package.json");
        let mut content = serde_json::to_string_pretty(manifest).unwrap();
        content.push('\n');
        self.write_file(&relative, &content);
        self.path(&relative)
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Could not write {}: {e}", path.display()));
    }

    /// Create an empty directory at `relative`.
    pub fn create_dir(&self, relative: &str) {
        fs::create_dir_all(self.path(relative)).unwrap();
    }

    /// Write `conform.toml` at the repository root.
    pub fn write_config(&self, toml: &str) {
        self.write_file("conform.toml", toml);
    }

    pub fn read_file(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    pub fn read_json(&self, relative: &str) -> Value {
        serde_json::from_str(&self.read_file(relative)).unwrap()
    }

    /// Assert that `path` (relative to the repo root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the repo root) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` contains `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read_file(path);
        assert!(
            file_content.contains(content),
            "File {path} does not contain {content:?}.\nActual content:\n{file_content}"
        );
    }
}
