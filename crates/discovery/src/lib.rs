//! Installed game discovery.
//!
//! Scans Steam library folders and Epic launcher manifests for games that
//! ship the DLSS runtime (`nvngx_dlss.dll`). Discovery is best-effort: an
//! unreadable drive, a broken manifest or an inaccessible subtree shortens
//! the result instead of failing the pass.

pub mod locator;
pub mod manifest;
pub mod marker;
pub mod types;

use std::io;
use std::path::PathBuf;

// Re-export primary types.
pub use locator::{DiscoveryConfig, GameLocator};
pub use manifest::{ManifestReader, default_manifest_dir};
pub use marker::MarkerLocator;
pub use types::{DEFAULT_IGNORED_FOLDERS, DEFAULT_MARKER, Game, InstallManifestRecord};

/// Errors for a single discovery source.
///
/// These never escape [`GameLocator::locate_games`]; they are logged and the
/// offending source is skipped.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
