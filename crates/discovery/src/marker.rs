//! Recursive marker file lookup.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::types::DEFAULT_MARKER;

/// Finds the folder holding a marker file inside a game tree.
#[derive(Debug, Clone)]
pub struct MarkerLocator {
    marker: String,
}

impl MarkerLocator {
    /// Creates a locator for the given file name (matched case-insensitively).
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Returns the marker file name.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Walks `dir` depth-first and returns the parent folder of the first
    /// file named like the marker.
    ///
    /// Unreadable subtrees are skipped. Returns `None` when nothing matches
    /// or `dir` does not exist.
    pub fn find(&self, dir: &Path) -> Option<PathBuf> {
        WalkDir::new(dir)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!(root = %dir.display(), error = %e, "skipping unreadable entry");
                    None
                }
            })
            .find(|entry| {
                entry.file_type().is_file()
                    && entry
                        .file_name()
                        .to_string_lossy()
                        .eq_ignore_ascii_case(&self.marker)
            })
            .and_then(|entry| entry.path().parent().map(Path::to_path_buf))
    }
}

impl Default for MarkerLocator {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn finds_nested_marker() {
        let tmp = tempfile::tempdir().unwrap();
        let bin = tmp.path().join("bin").join("x64");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("nvngx_dlss.dll"), "dlss").unwrap();

        let found = MarkerLocator::default().find(tmp.path());
        assert_eq!(found, Some(bin));
    }

    #[test]
    fn marker_match_ignores_case() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("NVNGX_DLSS.DLL"), "dlss").unwrap();

        let found = MarkerLocator::default().find(tmp.path());
        assert_eq!(found, Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn directory_named_like_marker_is_not_a_match() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("nvngx_dlss.dll")).unwrap();

        assert_eq!(MarkerLocator::default().find(tmp.path()), None);
    }

    #[test]
    fn no_marker_returns_none() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("data")).unwrap();
        fs::write(tmp.path().join("data").join("game.pak"), "pak").unwrap();

        assert_eq!(MarkerLocator::default().find(tmp.path()), None);
    }

    #[test]
    fn missing_directory_returns_none() {
        let found = MarkerLocator::default().find(Path::new("/definitely/not/real"));
        assert_eq!(found, None);
    }

    #[test]
    fn custom_marker() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("libxess.dll"), "xess").unwrap();

        let locator = MarkerLocator::new("libxess.dll");
        assert_eq!(locator.marker(), "libxess.dll");
        assert_eq!(locator.find(tmp.path()), Some(tmp.path().to_path_buf()));
    }
}
