//! Error types for patch operations.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// A single file step of an install or rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Backup,
    Copy,
    Restore,
    Delete,
    Record,
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileAction::Backup => write!(f, "back up"),
            FileAction::Copy => write!(f, "copy"),
            FileAction::Restore => write!(f, "restore"),
            FileAction::Delete => write!(f, "delete"),
            FileAction::Record => write!(f, "record"),
        }
    }
}

/// A file step that failed.
#[derive(Debug, thiserror::Error)]
#[error("failed to {action} {file}: {source}")]
pub struct FileFailure {
    pub file: String,
    pub action: FileAction,
    #[source]
    pub source: io::Error,
}

impl FileFailure {
    pub(crate) fn new(file: &str, action: FileAction, source: io::Error) -> Self {
        Self {
            file: file.to_string(),
            action,
            source,
        }
    }
}

/// Errors produced by install and rollback.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("game folder is not valid: '{0}'")]
    InvalidTarget(String),

    #[error("option folder {} is missing or unreadable: {source}", .path.display())]
    MissingOptionFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("another mod is already installed ({} exists), try rollback first", .backup.display())]
    AlreadyInstalled { backup: PathBuf },

    #[error("{}", summarize(.failures, .reverted))]
    PartialIo {
        failures: Vec<FileFailure>,
        reverted: bool,
    },

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn summarize(failures: &[FileFailure], reverted: &bool) -> String {
    let first = failures
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "unknown failure".into());
    let state = if *reverted {
        "changes were reverted"
    } else {
        "the game folder may be partially patched, rollback to finish restoring"
    };
    format!(
        "{} file operation(s) failed, first: {first}; {state}",
        failures.len()
    )
}
