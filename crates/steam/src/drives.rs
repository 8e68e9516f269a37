//! Drive enumeration with a static fallback list.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Drive letters tried when the system volume query fails.
pub const DEFAULT_FALLBACK_DRIVES: &[&str] = &["C:", "D:", "E:", "F:"];

/// Mount prefixes treated as removable or secondary volumes on Unix.
#[cfg(unix)]
const UNIX_VOLUME_PREFIXES: &[&str] = &["/mnt/", "/media/", "/run/media/"];

/// Source of mounted volume roots.
///
/// The system implementation is [`SystemVolumes`]; tests substitute their own.
pub trait VolumeSource: Send + Sync {
    /// Lists every mounted volume root.
    fn volume_roots(&self) -> io::Result<Vec<PathBuf>>;
}

/// Queries the operating system for mounted volumes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemVolumes;

impl VolumeSource for SystemVolumes {
    #[cfg(target_os = "windows")]
    fn volume_roots(&self) -> io::Result<Vec<PathBuf>> {
        let mut roots = Vec::new();
        for letter in b'A'..=b'Z' {
            let path = PathBuf::from(format!("{}:\\", letter as char));
            if path.exists() {
                roots.push(path);
            }
        }
        Ok(roots)
    }

    #[cfg(target_os = "linux")]
    fn volume_roots(&self) -> io::Result<Vec<PathBuf>> {
        let mounts = fs::read_to_string("/proc/mounts")?;
        Ok(parse_mounts(&mounts))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    fn volume_roots(&self) -> io::Result<Vec<PathBuf>> {
        Ok(vec![PathBuf::from("/")])
    }
}

/// Extracts mount points from `/proc/mounts` content.
#[cfg(any(target_os = "linux", test))]
fn parse_mounts(content: &str) -> Vec<PathBuf> {
    content
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(|mount| PathBuf::from(mount.replace("\\040", " ")))
        .collect()
}

/// Lists drive roots that may carry a `SteamLibrary` folder.
pub struct DriveEnumerator {
    source: Box<dyn VolumeSource>,
    fallback: Vec<PathBuf>,
}

impl DriveEnumerator {
    /// Creates an enumerator backed by the system volume list.
    pub fn new(fallback: &[String]) -> Self {
        Self::with_source(Box::new(SystemVolumes), fallback)
    }

    /// Creates an enumerator with a custom volume source.
    pub fn with_source(source: Box<dyn VolumeSource>, fallback: &[String]) -> Self {
        Self {
            source,
            fallback: fallback.iter().map(|d| drive_root(d)).collect(),
        }
    }

    /// Returns the readable drive roots, or the fallback list when the
    /// volume query fails.
    pub fn enumerate(&self) -> Vec<PathBuf> {
        match self.source.volume_roots() {
            Ok(roots) => roots
                .into_iter()
                .filter(|root| is_drive_root(root) && is_readable(root))
                .map(|root| drive_root(&root.to_string_lossy()))
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "volume enumeration failed, using fallback drives");
                self.fallback.clone()
            }
        }
    }
}

impl Default for DriveEnumerator {
    fn default() -> Self {
        let fallback: Vec<String> = DEFAULT_FALLBACK_DRIVES.iter().map(|d| d.to_string()).collect();
        Self::new(&fallback)
    }
}

/// Normalizes a drive spelling (`D:`, `D:\`, `/mnt/games/`) to a joinable root.
fn drive_root(drive: &str) -> PathBuf {
    let trimmed = normalize(drive);
    if trimmed.ends_with(':') {
        PathBuf::from(format!("{trimmed}/"))
    } else {
        PathBuf::from(trimmed)
    }
}

fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let trimmed = unified.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".into()
    } else {
        trimmed.to_string()
    }
}

/// Returns true for `X:` style roots, and on Unix for secondary mount points.
pub fn is_drive_root(path: &Path) -> bool {
    let normalized = normalize(&path.to_string_lossy());
    let bytes = normalized.as_bytes();
    if bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        return true;
    }

    #[cfg(unix)]
    {
        let with_slash = format!("{normalized}/");
        UNIX_VOLUME_PREFIXES
            .iter()
            .any(|prefix| with_slash.starts_with(prefix) && with_slash.len() > prefix.len())
    }

    #[cfg(not(unix))]
    {
        false
    }
}

fn is_readable(path: &Path) -> bool {
    fs::read_dir(path).is_ok()
}
