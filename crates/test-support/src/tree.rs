use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builds a small file tree under a temp directory, for tests that need a
/// source or destination root without hand-rolling `fs::create_dir_all`
/// calls at every call site.
pub struct TreeBuilder {
    dir: TempDir,
}

impl TreeBuilder {
    /// Creates an empty temp directory.
    ///
    /// # Panics
    ///
    /// Panics if the temp directory cannot be created, which only happens
    /// when the host filesystem is unusable.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `contents` to `relative`, creating parent directories as
    /// needed.
    ///
    /// # Panics
    ///
    /// Panics on any I/O failure; test fixtures are expected to always
    /// succeed on a working filesystem.
    pub fn file(&self, relative: &str, contents: &[u8]) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// Creates an empty directory at `relative`.
    ///
    /// # Panics
    ///
    /// Panics on any I/O failure.
    pub fn dir(&self, relative: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(&path).expect("create fixture dir");
        path
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_creates_parent_directories() {
        let tree = TreeBuilder::new();
        let path = tree.file("a/b/c.txt", b"hi");
        assert_eq!(fs::read(&path).unwrap(), b"hi");
    }

    #[test]
    fn dir_creates_an_empty_directory() {
        let tree = TreeBuilder::new();
        let path = tree.dir("empty");
        assert!(path.is_dir());
        assert_eq!(fs::read_dir(&path).unwrap().count(), 0);
    }
}
