//! Epic Games Launcher manifest store.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::DiscoveryError;
use crate::marker::MarkerLocator;
use crate::types::{Game, InstallManifestRecord};

/// Returns the launcher's manifest folder,
/// `%PROGRAMDATA%/Epic/EpicGamesLauncher/Data/Manifests`.
pub fn default_manifest_dir() -> PathBuf {
    let program_data = std::env::var_os("PROGRAMDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("C:\\ProgramData"));
    program_data
        .join("Epic")
        .join("EpicGamesLauncher")
        .join("Data")
        .join("Manifests")
}

/// Reads every manifest in a directory into game candidates.
pub struct ManifestReader {
    dir: PathBuf,
    locator: MarkerLocator,
}

impl ManifestReader {
    pub fn new(dir: impl Into<PathBuf>, locator: MarkerLocator) -> Self {
        Self {
            dir: dir.into(),
            locator,
        }
    }

    /// Returns one candidate per readable manifest, in file-name order.
    ///
    /// Malformed or unreadable manifests are logged and skipped. Candidates
    /// keep `dll_location = None` when the marker is not found.
    pub fn read(&self) -> Vec<Game> {
        if !self.dir.is_dir() {
            tracing::debug!(dir = %self.dir.display(), "manifest directory not present");
            return Vec::new();
        }

        let mut files = match manifest_files(&self.dir) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(error = %e, "failed to list manifests");
                return Vec::new();
            }
        };
        files.sort();

        files
            .par_iter()
            .filter_map(|path| match self.read_record(path) {
                Ok(game) => Some(game),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping manifest");
                    None
                }
            })
            .collect()
    }

    fn read_record(&self, path: &Path) -> Result<Game, DiscoveryError> {
        let content = fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let record = parse_manifest(&content).map_err(|source| DiscoveryError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;

        let main_location = PathBuf::from(&record.install_location);
        let dll_location = self.locator.find(&main_location);
        Ok(Game {
            name: record.display_name,
            main_location,
            dll_location,
        })
    }
}

/// Parses a manifest body.
pub fn parse_manifest(content: &str) -> Result<InstallManifestRecord, serde_json::Error> {
    serde_json::from_str(content)
}

/// Lists regular files directly inside `dir`.
fn manifest_files(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let entries = fs::read_dir(dir).map_err(|source| DiscoveryError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    Ok(entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_manifest(dir: &Path, file: &str, name: &str, location: &Path) {
        let body = serde_json::json!({
            "FormatVersion": 0,
            "DisplayName": name,
            "InstallLocation": location,
        });
        fs::write(dir.join(file), body.to_string()).unwrap();
    }

    #[test]
    fn reads_manifests_and_resolves_marker() {
        let tmp = tempfile::tempdir().unwrap();
        let manifests = tmp.path().join("Manifests");
        let game = tmp.path().join("AlanWake2");
        fs::create_dir_all(&manifests).unwrap();
        fs::create_dir_all(game.join("bin")).unwrap();
        fs::write(game.join("bin").join("nvngx_dlss.dll"), "dlss").unwrap();
        write_manifest(&manifests, "A1.item", "Alan Wake 2", &game);

        let games = ManifestReader::new(&manifests, MarkerLocator::default()).read();
        assert_eq!(
            games,
            vec![Game {
                name: "Alan Wake 2".into(),
                main_location: game.clone(),
                dll_location: Some(game.join("bin")),
            }]
        );
    }

    #[test]
    fn malformed_manifest_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let game = tmp.path().join("Good");
        fs::create_dir_all(&game).unwrap();
        fs::write(tmp.path().join("0-broken.item"), "{ not json").unwrap();
        fs::write(tmp.path().join("1-partial.item"), r#"{"DisplayName": "x"}"#).unwrap();
        write_manifest(tmp.path(), "2-good.item", "Good Game", &game);

        let games = ManifestReader::new(tmp.path(), MarkerLocator::default()).read();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].name, "Good Game");
        assert_eq!(games[0].dll_location, None);
    }

    #[test]
    fn subdirectories_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("Pending")).unwrap();

        let games = ManifestReader::new(tmp.path(), MarkerLocator::default()).read();
        assert!(games.is_empty());
    }

    #[test]
    fn results_follow_file_name_order() {
        let tmp = tempfile::tempdir().unwrap();
        let game = tmp.path().join("Shared");
        fs::create_dir_all(&game).unwrap();
        write_manifest(tmp.path(), "b.item", "Second", &game);
        write_manifest(tmp.path(), "a.item", "First", &game);

        let names: Vec<String> = ManifestReader::new(tmp.path(), MarkerLocator::default())
            .read()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn missing_directory_yields_nothing() {
        let reader = ManifestReader::new("/definitely/not/real", MarkerLocator::default());
        assert!(reader.read().is_empty());
    }

    #[test]
    fn default_manifest_dir_layout() {
        let dir = default_manifest_dir();
        assert!(dir.ends_with("Epic/EpicGamesLauncher/Data/Manifests"));
    }
}
