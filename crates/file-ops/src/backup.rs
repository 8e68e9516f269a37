//! The `bak` folder holding displaced originals.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::BACKUP_DIR;

/// Ledger of files an install added without displacing an original.
///
/// Option files with this name are never installed, so the ledger cannot
/// collide with a backed-up original.
pub(crate) const ADDED_LEDGER: &str = ".added";

/// Backup folder of one game folder.
#[derive(Debug, Clone)]
pub struct BackupStore {
    path: PathBuf,
}

impl BackupStore {
    /// Returns the store for `<target>/bak`.
    pub fn for_target(target: &Path) -> Self {
        Self {
            path: target.join(BACKUP_DIR),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Creates the folder and its parents. Idempotent.
    pub fn create(&self) -> io::Result<()> {
        fs::create_dir_all(&self.path)
    }

    /// Returns true when the folder has no entries or does not exist.
    pub fn is_empty(&self) -> bool {
        match fs::read_dir(&self.path) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => true,
        }
    }

    /// Deletes the folder only when it is empty.
    ///
    /// Returns whether the folder was removed.
    pub fn remove_if_empty(&self) -> io::Result<bool> {
        if !self.exists() {
            return Ok(false);
        }
        if !self.is_empty() {
            tracing::debug!(path = %self.path.display(), "backup folder not empty, keeping it");
            return Ok(false);
        }
        fs::remove_dir(&self.path)?;
        Ok(true)
    }

    /// Returns the backup location for a file name.
    pub fn entry(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Returns true when a backup copy of `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_file()
    }

    /// Records the files an install added, replacing any earlier record.
    ///
    /// An empty list drops the ledger.
    pub(crate) fn record_added(&self, names: &[String]) -> io::Result<()> {
        if names.is_empty() {
            return self.clear_added();
        }
        let mut content = names.join("\n");
        content.push('\n');
        fs::write(self.path.join(ADDED_LEDGER), content)
    }

    /// Returns the files the last install added; empty when none were recorded.
    pub(crate) fn added(&self) -> io::Result<Vec<String>> {
        match fs::read_to_string(self.path.join(ADDED_LEDGER)) {
            Ok(content) => Ok(content
                .lines()
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Drops the added-files ledger.
    pub(crate) fn clear_added(&self) -> io::Result<()> {
        match fs::remove_file(self.path.join(ADDED_LEDGER)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
