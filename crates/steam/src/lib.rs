//! Storage roots and Steam library locations.
//!
//! Answers one question for the discovery pass: which directories may hold
//! installed games. Drive enumeration is best-effort and never fails; Steam
//! install detection and `libraryfolders.vdf` reading report errors through
//! [`SteamError`] so callers can decide whether to log or ignore them.

pub mod drives;
pub mod paths;
#[cfg(target_os = "linux")]
mod paths_linux;
#[cfg(target_os = "windows")]
mod paths_windows;
pub mod vdf;

// Re-export primary types.
pub use drives::{DEFAULT_FALLBACK_DRIVES, DriveEnumerator, SystemVolumes, VolumeSource};
pub use paths::{
    LIBRARY_SUFFIX, LibrarySearch, WINDOWS_COMMON_PATH, common_dir, default_common_path,
    library_path, steam_base_dir,
};
pub use vdf::{library_folders, library_roots};

/// Errors for Steam path operations.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("steam installation not found")]
    NotFound,

    #[error("VDF parse error: {0}")]
    Vdf(String),

    #[error("I/O error: {0}")]
    Io(String),
}
