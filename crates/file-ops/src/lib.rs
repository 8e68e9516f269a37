//! Reversible mod installation.
//!
//! Installing an option copies its files into a game folder after moving any
//! originals aside into `<game>/bak`. Rolling back moves the originals home
//! and removes the backup folder. The backup folder's existence is the
//! per-folder patch state: present means [`PatchState::Patched`].

mod backup;
mod error;
mod lock;
mod option;
mod patch;

pub use backup::BackupStore;
pub use error::{FileAction, FileFailure, PatchError};
pub use option::ModOption;
pub use patch::{Mode, PatchEngine, PatchReport, PatchState};

/// Name of the backup folder created inside a game folder.
pub const BACKUP_DIR: &str = "bak";

/// Readme files shipped in option folders; never installed or touched.
pub const README_FILES: &[&str] = &["READ ME.txt", "README.txt"];

/// File added by some options that has no original to restore.
pub const REMOVABLE_ARTIFACT: &str = "dlssg_to_fsr3_amd_is_better.dll";

/// Default base directory holding one folder per option.
pub const DEFAULT_OPTIONS_DIR: &str = "dlss-fg";
