//! fgpatch configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/fgpatch/config.toml`
//! - Windows: `%APPDATA%/fgpatch/config.toml`

use std::path::{Path, PathBuf};

use fgpatch_discovery::{
    DEFAULT_IGNORED_FOLDERS, DEFAULT_MARKER, DiscoveryConfig, default_manifest_dir,
};
use fgpatch_file_ops::{DEFAULT_OPTIONS_DIR, PatchEngine};
use fgpatch_steam::{DEFAULT_FALLBACK_DRIVES, DriveEnumerator, LibrarySearch};
use serde::{Deserialize, Serialize};

/// fgpatch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Folder holding one subfolder per mod option.
    #[serde(default = "default_options_dir")]
    pub options_dir: String,

    /// Common Steam library scanned first (platform default when unset).
    #[serde(default)]
    pub common_path: Option<String>,

    /// Drives tried when volume enumeration fails.
    #[serde(default = "default_fallback_drives")]
    pub fallback_drives: Vec<String>,

    /// Additional library folders to scan.
    #[serde(default)]
    pub extra_library_roots: Vec<String>,

    /// Read libraries listed in Steam's `libraryfolders.vdf`.
    #[serde(default = "default_true")]
    pub use_steam_library_folders: bool,

    /// Scan Epic Games Launcher manifests.
    #[serde(default = "default_true")]
    pub scan_manifests: bool,

    /// Manifest folder (launcher default when unset).
    #[serde(default)]
    pub manifest_dir: Option<String>,

    /// Library subfolders that are never games.
    #[serde(default = "default_ignore_folders")]
    pub ignore_folders: Vec<String>,

    /// File that marks a game as patchable.
    #[serde(default = "default_marker_file")]
    pub marker_file: String,
}

fn default_options_dir() -> String {
    DEFAULT_OPTIONS_DIR.into()
}

fn default_fallback_drives() -> Vec<String> {
    DEFAULT_FALLBACK_DRIVES.iter().map(|d| d.to_string()).collect()
}

fn default_true() -> bool {
    true
}

fn default_ignore_folders() -> Vec<String> {
    DEFAULT_IGNORED_FOLDERS.iter().map(|d| d.to_string()).collect()
}

fn default_marker_file() -> String {
    DEFAULT_MARKER.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            options_dir: default_options_dir(),
            common_path: None,
            fallback_drives: default_fallback_drives(),
            extra_library_roots: Vec::new(),
            use_steam_library_folders: default_true(),
            scan_manifests: default_true(),
            manifest_dir: None,
            ignore_folders: default_ignore_folders(),
            marker_file: default_marker_file(),
        }
    }
}

impl Config {
    /// Loads configuration from `path` (or the platform default), creating a
    /// default file if none exists.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::debug!(path = %path.display(), "configuration loaded");
            Ok(config)
        } else {
            let config = Config::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Builds the discovery inputs described by this configuration.
    pub fn discovery_config(&self) -> DiscoveryConfig {
        let common_path = self
            .common_path
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(fgpatch_steam::default_common_path);

        let steam_base = if self.use_steam_library_folders {
            fgpatch_steam::steam_base_dir().ok()
        } else {
            None
        };

        let manifest_dir = self.scan_manifests.then(|| {
            self.manifest_dir
                .as_deref()
                .map(expand_home)
                .unwrap_or_else(default_manifest_dir)
        });

        DiscoveryConfig {
            search: LibrarySearch {
                common_path,
                drives: DriveEnumerator::new(&self.fallback_drives),
                steam_base,
                extra_roots: self
                    .extra_library_roots
                    .iter()
                    .map(|r| expand_home(r))
                    .collect(),
            },
            manifest_dir,
            ignore: self.ignore_folders.clone(),
            marker: self.marker_file.clone(),
        }
    }

    /// Builds the patch engine for the configured options folder.
    pub fn patch_engine(&self) -> PatchEngine {
        PatchEngine::new(expand_home(&self.options_dir))
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("fgpatch").join("config.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("fgpatch")
            .join("config.toml"))
    }
}

/// Expands a `~` prefix to the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    let home = || {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
    };
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = home()
    {
        return home.join(rest);
    }
    if path == "~"
        && let Some(home) = home()
    {
        return home;
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.options_dir, "dlss-fg");
        assert_eq!(config.fallback_drives, vec!["C:", "D:", "E:", "F:"]);
        assert_eq!(config.ignore_folders, vec!["Steamworks Shared"]);
        assert_eq!(config.marker_file, "nvngx_dlss.dll");
        assert!(config.scan_manifests);
        assert!(config.use_steam_library_folders);
        assert!(config.common_path.is_none());
    }

    #[test]
    fn config_partial_toml() {
        let toml_str = r#"
options_dir = "/opt/dlss-fg"
extra_library_roots = ["/mnt/games/steamapps/common"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.options_dir, "/opt/dlss-fg");
        assert_eq!(config.extra_library_roots.len(), 1);
        assert_eq!(config.marker_file, "nvngx_dlss.dll");
        assert_eq!(config.fallback_drives.len(), 4);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = Config {
            common_path: Some("D:/Steam/steamapps/common".into()),
            scan_manifests: false,
            ..Config::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn load_creates_default_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let reloaded = Config::load(Some(&path)).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn load_rejects_invalid_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "options_dir = [").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn discovery_config_honors_overrides() {
        let config = Config {
            common_path: Some("/games/common".into()),
            manifest_dir: Some("/epic/manifests".into()),
            use_steam_library_folders: false,
            ignore_folders: vec!["Tools".into()],
            marker_file: "libxess.dll".into(),
            ..Config::default()
        };
        let discovery = config.discovery_config();
        assert_eq!(discovery.search.common_path, PathBuf::from("/games/common"));
        assert!(discovery.search.steam_base.is_none());
        assert_eq!(discovery.manifest_dir, Some(PathBuf::from("/epic/manifests")));
        assert_eq!(discovery.ignore, vec!["Tools"]);
        assert_eq!(discovery.marker, "libxess.dll");
    }

    #[test]
    fn manifests_can_be_disabled() {
        let config = Config {
            scan_manifests: false,
            ..Config::default()
        };
        assert!(config.discovery_config().manifest_dir.is_none());
    }

    #[test]
    fn expand_home_passthrough() {
        assert_eq!(expand_home("/absolute/path"), PathBuf::from("/absolute/path"));
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(expand_home("~/dlss-fg"), PathBuf::from(home).join("dlss-fg"));
        }
    }
}
