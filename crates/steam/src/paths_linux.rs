use std::path::{Path, PathBuf};

use crate::SteamError;

/// Returns the Steam base directory on Linux.
pub(crate) fn get_base_dir() -> Result<PathBuf, SteamError> {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or(SteamError::NotFound)?;

    candidate_dirs(&home)
        .into_iter()
        .find(|dir| dir.exists())
        .ok_or(SteamError::NotFound)
}

/// Steam install locations in probe order: native, XDG data dir, Flatpak.
fn candidate_dirs(home: &Path) -> Vec<PathBuf> {
    vec![
        home.join(".steam").join("steam"),
        home.join(".local").join("share").join("Steam"),
        home.join(".var")
            .join("app")
            .join("com.valvesoftware.Steam")
            .join(".steam")
            .join("steam"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_prefer_native_install() {
        let dirs = candidate_dirs(Path::new("/home/deck"));
        assert_eq!(dirs[0], PathBuf::from("/home/deck/.steam/steam"));
        assert_eq!(dirs.len(), 3);
        assert!(dirs[2].to_string_lossy().contains("com.valvesoftware.Steam"));
    }
}
