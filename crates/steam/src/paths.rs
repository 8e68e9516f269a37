use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::SteamError;
use crate::drives::DriveEnumerator;

/// Library folder appended to every enumerated drive root.
pub const LIBRARY_SUFFIX: &str = "SteamLibrary/steamapps/common";

/// Default Steam library on a stock Windows install.
pub const WINDOWS_COMMON_PATH: &str = "C:/Program Files (x86)/Steam/steamapps/common";

/// Returns the `SteamLibrary/steamapps/common` folder on a drive root.
pub fn library_path(drive: &Path) -> PathBuf {
    drive.join(LIBRARY_SUFFIX)
}

/// Returns the `steamapps/common` folder of a Steam installation.
pub fn common_dir(steam_base: &Path) -> PathBuf {
    steam_base.join("steamapps").join("common")
}

/// Returns the platform's well-known common library path.
///
/// On Windows this is always [`WINDOWS_COMMON_PATH`]. Elsewhere it is the
/// detected Steam install's `steamapps/common`, or `~/.steam/steam/steamapps/common`
/// when no install is found.
pub fn default_common_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        PathBuf::from(WINDOWS_COMMON_PATH)
    }

    #[cfg(not(target_os = "windows"))]
    {
        steam_base_dir()
            .map(|base| common_dir(&base))
            .unwrap_or_else(|_| {
                let home = std::env::var_os("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("/tmp"));
                common_dir(&home.join(".steam").join("steam"))
            })
    }
}

/// Locates the Steam installation directory.
pub fn steam_base_dir() -> Result<PathBuf, SteamError> {
    get_base_dir()
}

// Platform-specific base directory detection.
#[cfg(target_os = "linux")]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    crate::paths_linux::get_base_dir()
}

#[cfg(target_os = "windows")]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    crate::paths_windows::get_base_dir()
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    Err(SteamError::NotFound)
}

/// Inputs for computing the library roots scanned by discovery.
pub struct LibrarySearch {
    /// Well-known common library, always scanned first.
    pub common_path: PathBuf,
    /// Drives probed for a `SteamLibrary` folder.
    pub drives: DriveEnumerator,
    /// Steam install whose `libraryfolders.vdf` contributes more roots.
    pub steam_base: Option<PathBuf>,
    /// User-configured roots, appended last.
    pub extra_roots: Vec<PathBuf>,
}

impl LibrarySearch {
    /// Returns every candidate library root in scan order, without duplicates.
    ///
    /// Roots are not checked for existence here.
    pub fn roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![self.common_path.clone()];
        roots.extend(self.drives.enumerate().iter().map(|d| library_path(d)));
        if let Some(base) = &self.steam_base {
            roots.extend(crate::vdf::library_folders(base));
        }
        roots.extend(self.extra_roots.iter().cloned());
        dedup_paths(roots)
    }
}

/// Drops repeated paths, keeping the first occurrence.
fn dedup_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|p| seen.insert(path_key(p)))
        .collect()
}

fn path_key(path: &Path) -> String {
    let key = path.to_string_lossy().replace('\\', "/");
    let key = key.trim_end_matches('/');
    if cfg!(windows) {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::drives::VolumeSource;

    struct NoVolumes;

    impl VolumeSource for NoVolumes {
        fn volume_roots(&self) -> io::Result<Vec<PathBuf>> {
            Ok(Vec::new())
        }
    }

    fn no_drives() -> DriveEnumerator {
        DriveEnumerator::with_source(Box::new(NoVolumes), &[])
    }

    #[test]
    fn library_path_appends_suffix() {
        assert_eq!(
            library_path(Path::new("D:/")),
            PathBuf::from("D:/SteamLibrary/steamapps/common")
        );
    }

    #[test]
    fn common_dir_structure() {
        assert_eq!(
            common_dir(Path::new("/home/user/.steam/steam")),
            PathBuf::from("/home/user/.steam/steam/steamapps/common")
        );
    }

    #[test]
    fn roots_start_with_common_path() {
        let search = LibrarySearch {
            common_path: PathBuf::from("/games/common"),
            drives: no_drives(),
            steam_base: None,
            extra_roots: vec![PathBuf::from("/more/games")],
        };
        assert_eq!(
            search.roots(),
            vec![PathBuf::from("/games/common"), PathBuf::from("/more/games")]
        );
    }

    #[test]
    fn roots_are_deduplicated() {
        let search = LibrarySearch {
            common_path: PathBuf::from("/games/common"),
            drives: no_drives(),
            steam_base: None,
            extra_roots: vec![
                PathBuf::from("/games/common/"),
                PathBuf::from("/other"),
                PathBuf::from("/other"),
            ],
        };
        assert_eq!(
            search.roots(),
            vec![PathBuf::from("/games/common"), PathBuf::from("/other")]
        );
    }

    #[test]
    fn roots_include_library_folders() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("Steam");
        let data = tmp.path().join("data");
        crate::vdf::tests::write_library_folders(&base, std::slice::from_ref(&data));

        let search = LibrarySearch {
            common_path: PathBuf::from("/games/common"),
            drives: no_drives(),
            steam_base: Some(base),
            extra_roots: Vec::new(),
        };
        assert_eq!(
            search.roots(),
            vec![PathBuf::from("/games/common"), common_dir(&data)]
        );
    }
}
