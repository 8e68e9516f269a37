//! Game discovery across Steam libraries and launcher manifests.

use std::fs;
use std::path::{Path, PathBuf};

use fgpatch_steam::LibrarySearch;
use rayon::prelude::*;

use crate::manifest::ManifestReader;
use crate::marker::MarkerLocator;
use crate::types::Game;

/// Where and how to look for games.
pub struct DiscoveryConfig {
    /// Library roots (common path, drive libraries, extra roots).
    pub search: LibrarySearch,
    /// Launcher manifest folder; `None` disables manifest discovery.
    pub manifest_dir: Option<PathBuf>,
    /// Library subfolder names that are never games.
    pub ignore: Vec<String>,
    /// Marker file name.
    pub marker: String,
}

/// Composes library scanning and manifest reading into one game list.
pub struct GameLocator {
    search: LibrarySearch,
    manifests: Option<ManifestReader>,
    ignore: Vec<String>,
    locator: MarkerLocator,
}

impl GameLocator {
    pub fn new(config: DiscoveryConfig) -> Self {
        let locator = MarkerLocator::new(config.marker);
        let manifests = config
            .manifest_dir
            .map(|dir| ManifestReader::new(dir, locator.clone()));
        Self {
            search: config.search,
            manifests,
            ignore: config.ignore,
            locator,
        }
    }

    /// Returns every installed game whose marker file was found.
    ///
    /// Library results come first (root order, then folder name), manifest
    /// results second. A title present in both sources appears twice. Never
    /// fails: broken sources are logged and skipped.
    pub fn locate_games(&self) -> Vec<Game> {
        let folders: Vec<PathBuf> = self
            .search
            .roots()
            .iter()
            .filter(|root| root.is_dir())
            .flat_map(|root| self.game_folders(root))
            .collect();

        let library_games: Vec<Game> = folders
            .par_iter()
            .map(|folder| Game {
                name: folder_name(folder),
                main_location: folder.clone(),
                dll_location: self.locator.find(folder),
            })
            .collect();

        let manifest_games = self
            .manifests
            .as_ref()
            .map(ManifestReader::read)
            .unwrap_or_default();

        let candidates = library_games.len() + manifest_games.len();
        let games: Vec<Game> = library_games
            .into_iter()
            .chain(manifest_games)
            .filter(|game| game.dll_location.is_some())
            .collect();

        tracing::info!(
            candidates,
            found = games.len(),
            marker = self.locator.marker(),
            "game discovery finished"
        );
        games
    }

    /// Lists the non-ignored subfolders of a library root, sorted by name.
    fn game_folders(&self, root: &Path) -> Vec<PathBuf> {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "failed to read library");
                return Vec::new();
            }
        };

        let mut folders: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter(|path| !self.ignore.iter().any(|name| *name == folder_name(path)))
            .collect();
        folders.sort();

        tracing::debug!(root = %root.display(), count = folders.len(), "scanned library");
        folders
    }
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
