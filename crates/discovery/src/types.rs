use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// File whose presence marks a game folder as patchable.
pub const DEFAULT_MARKER: &str = "nvngx_dlss.dll";

/// Library subfolders that never hold a game.
pub const DEFAULT_IGNORED_FOLDERS: &[&str] = &["Steamworks Shared"];

/// An installed game found by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Display name (library folder name or launcher display name).
    pub name: String,
    /// Install root.
    pub main_location: PathBuf,
    /// Folder holding the marker file, if one was found.
    pub dll_location: Option<PathBuf>,
}

/// One Epic Games Launcher manifest (`*.item`), reduced to the fields used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstallManifestRecord {
    #[serde(rename = "DisplayName")]
    pub display_name: String,
    #[serde(rename = "InstallLocation")]
    pub install_location: String,
}
