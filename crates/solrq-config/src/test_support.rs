//! Fixture trees of `.solrq.toml` files for unit tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::discovery::CONFIG_FILENAME;

/// A temporary directory tree holding config files.
pub struct TestDir {
    /// Owned temporary root, removed on drop.
    root: TempDir,
}

impl TestDir {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    /// Returns the tree root.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates `rel_path` (and parents) and returns it.
    pub fn dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes `.solrq.toml` with `body` into `rel_dir`; `""` means the tree root.
    pub fn config(&self, rel_dir: &str, body: &str) -> PathBuf {
        let path = self.dir(rel_dir).join(CONFIG_FILENAME);
        fs::write(&path, body).unwrap();
        path
    }

    /// Writes a `.solrq.toml` that ends discovery into `rel_dir`.
    pub fn root_config(&self, rel_dir: &str, body: &str) -> PathBuf {
        self.config(rel_dir, &format!("root = true\n{body}"))
    }
}
