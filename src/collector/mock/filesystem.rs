//! In-memory mock filesystem for testing collectors without real `/proc`.
//!
//! This module provides `MockFs` which simulates a filesystem in memory,
//! allowing tests to run on macOS and in CI environments without Linux.

use crate::collector::traits::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tree {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Set of directories (for read_dir support).
    directories: HashSet<PathBuf>,
}

impl Tree {
    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }
}

/// In-memory filesystem for testing.
///
/// Clones share the same tree: a test keeps one handle, gives a clone to the
/// collector, and rewrites `/proc` between refresh cycles.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    tree: Arc<RwLock<Tree>>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tree> {
        self.tree.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tree> {
        self.tree.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds or replaces a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        let mut tree = self.write();
        tree.add_parents(&path);
        tree.files.insert(path, content.into());
    }

    /// Adds an empty directory.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut tree = self.write();
        tree.add_parents(&path);
        tree.directories.insert(path);
    }

    /// Removes a single file. Missing files are ignored.
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        self.write().files.remove(path.as_ref());
    }

    /// Removes a directory and everything below it.
    pub fn remove_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut tree = self.write();
        tree.files.retain(|p, _| !p.starts_with(path));
        tree.directories.retain(|p| !p.starts_with(path));
    }

    /// Adds a process with its `/proc/[pid]/` files.
    ///
    /// # Arguments
    /// * `pid` - Process ID
    /// * `stat` - Content of `/proc/[pid]/stat`
    /// * `status` - Content of `/proc/[pid]/status` (skipped if empty)
    /// * `cmdline` - Content of `/proc/[pid]/cmdline`
    pub fn add_process(&self, pid: u32, stat: &str, status: &str, cmdline: &str) {
        let base = PathBuf::from(format!("/proc/{}", pid));
        self.add_dir(&base);
        self.add_file(base.join("stat"), stat);
        if !status.is_empty() {
            self.add_file(base.join("status"), status);
        }
        self.add_file(base.join("cmdline"), cmdline);
    }

    /// Removes `/proc/[pid]/` as if the process exited.
    pub fn remove_process(&self, pid: u32) {
        self.remove_dir(format!("/proc/{}", pid));
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.read().files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let tree = self.read();
        if !tree.directories.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {:?}", path),
            ));
        }

        let mut entries = HashSet::new();

        // Find all files and directories that are direct children
        for file_path in tree.files.keys() {
            if file_path.parent().is_some_and(|parent| parent == path) {
                entries.insert(file_path.clone());
            }
        }

        for dir_path in &tree.directories {
            if dir_path.parent().is_some_and(|parent| parent == path) && dir_path != path {
                entries.insert(dir_path.clone());
            }
        }

        Ok(entries.into_iter().collect())
    }
}
