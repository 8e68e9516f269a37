//! Extra library roots listed in Steam's `libraryfolders.vdf`.

use std::path::{Path, PathBuf};

use steamlocate::SteamDir;

use crate::SteamError;
use crate::paths::common_dir;

/// Returns the `steamapps/common` folder of every library listed in
/// `<steam_base>/steamapps/libraryfolders.vdf`.
///
/// A missing or malformed file yields an empty list.
pub fn library_folders(steam_base: &Path) -> Vec<PathBuf> {
    let path = steam_base.join("steamapps").join("libraryfolders.vdf");
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "no libraryfolders.vdf");
        return Vec::new();
    }

    match library_roots(steam_base) {
        Ok(libraries) => libraries.iter().map(|lib| common_dir(lib)).collect(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed libraryfolders.vdf");
            Vec::new()
        }
    }
}

/// Returns the root of every library the Steam install at `steam_base` lists.
///
/// Libraries that cannot be opened are logged and skipped.
pub fn library_roots(steam_base: &Path) -> Result<Vec<PathBuf>, SteamError> {
    let steam_dir = SteamDir::from_dir(steam_base).map_err(|e| SteamError::Vdf(e.to_string()))?;
    let libraries = steam_dir
        .libraries()
        .map_err(|e| SteamError::Vdf(e.to_string()))?;

    let mut roots = Vec::new();
    for library in libraries {
        match library {
            Ok(library) => roots.push(library.path().to_path_buf()),
            Err(e) => tracing::debug!(error = %e, "skipping unreadable steam library"),
        }
    }
    Ok(roots)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::fs;

    use super::*;

    /// Writes a `libraryfolders.vdf` under `steam_base` listing `libraries`
    /// and creates each library's `steamapps` folder.
    pub(crate) fn write_library_folders(steam_base: &Path, libraries: &[PathBuf]) {
        let mut content = String::from("\"libraryfolders\"\n{\n");
        for (i, library) in libraries.iter().enumerate() {
            fs::create_dir_all(library.join("steamapps")).unwrap();
            content.push_str(&format!(
                "\t\"{i}\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t\t\"label\"\t\t\"\"\n\t\t\"contentid\"\t\t\"4417612584920128000\"\n\t\t\"totalsize\"\t\t\"0\"\n\t\t\"update_clean_bytes_tally\"\t\t\"0\"\n\t\t\"time_last_update_corruption\"\t\t\"0\"\n\t\t\"apps\"\n\t\t{{\n\t\t}}\n\t}}\n",
                library.display().to_string().replace('\\', "\\\\")
            ));
        }
        content.push_str("}\n");

        let steamapps = steam_base.join("steamapps");
        fs::create_dir_all(&steamapps).unwrap();
        fs::write(steamapps.join("libraryfolders.vdf"), content).unwrap();
    }

    #[test]
    fn lists_every_library() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("Steam");
        let second = tmp.path().join("SteamLibrary");
        write_library_folders(&base, &[base.clone(), second.clone()]);

        assert_eq!(library_roots(&base).unwrap(), vec![base.clone(), second.clone()]);
        assert_eq!(
            library_folders(&base),
            vec![common_dir(&base), common_dir(&second)]
        );
    }

    #[test]
    fn missing_file_yields_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(library_folders(tmp.path()).is_empty());
    }

    #[test]
    fn malformed_file_yields_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let steamapps = tmp.path().join("steamapps");
        fs::create_dir_all(&steamapps).unwrap();
        fs::write(steamapps.join("libraryfolders.vdf"), "\"libraryfolders\" {").unwrap();

        assert!(library_roots(tmp.path()).is_err());
        assert!(library_folders(tmp.path()).is_empty());
    }

    #[test]
    fn missing_steam_base_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = library_roots(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, SteamError::Vdf(_)));
    }
}
